//! Data models for Biblio

pub mod author;
pub mod book;
pub mod category;
pub mod loan;

