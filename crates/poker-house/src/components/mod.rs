pub mod chips;
pub mod deck;
pub mod entity;
pub mod interactable;
pub mod inventory;
pub mod item;
pub mod person;
pub mod table;
