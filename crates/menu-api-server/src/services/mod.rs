pub mod filter;
pub mod grouping;
pub mod menu_service;
pub mod session;
pub mod view;

pub use filter::{filter_and_sort, DietaryFilter, SortMode};
pub use grouping::{group_by_category, CategorySummary};
pub use menu_service::MenuService;
pub use session::{JumpTarget, SessionCache, SessionId};
pub use view::{derive_view, ViewModel, ViewOptions, ViewState};
