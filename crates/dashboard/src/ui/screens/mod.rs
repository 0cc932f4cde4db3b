pub mod accounts;
pub mod loading;
pub mod overview;
