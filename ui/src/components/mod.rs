mod app_navbar;
pub use app_navbar::AppNavbar;
