pub mod card;
pub mod concept;
pub mod note;
