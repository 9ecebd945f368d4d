pub mod pricehistory;
pub mod pricerecord;
pub mod pricestore;
