pub mod bar_chart;
pub mod card_animated;
pub mod date_input;
pub mod stat_card;
pub mod table_checkbox;
pub mod toast;
