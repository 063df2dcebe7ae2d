pub mod detail;
pub mod filters;
pub mod item_list;
pub mod map_view;
pub mod sidebar;
