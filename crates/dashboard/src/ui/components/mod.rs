pub mod card;
pub mod tabs;
pub mod toast;
