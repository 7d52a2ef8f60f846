pub mod active_banner;
pub mod bottom_nav;
pub mod challenge_popup;
pub mod challenge_row;
pub mod kind_icon;
pub mod map_view;
pub mod nearby_panel;
pub mod style_picker;
