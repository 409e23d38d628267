pub mod static_user_directory;

pub use static_user_directory::StaticUserDirectory;
