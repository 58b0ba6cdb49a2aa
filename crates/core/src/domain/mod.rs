pub mod product;
pub mod question;
