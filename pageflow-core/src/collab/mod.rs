//! Page behaviours outside the motion controllers: in-page navigation, the
//! header, the mobile menu, outbound chat links and the year stamp.

pub mod header;
pub mod menu;
pub mod navigation;
pub mod outbound;

pub use header::{Header, current_year, stamp_year};
pub use menu::MobileMenu;
pub use navigation::Navigation;
pub use outbound::{FormFields, Outbound, form_message, interest_message};
