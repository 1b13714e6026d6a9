pub mod booking_calendar;
pub mod booking_page;
pub mod chat_view;
pub mod header;
pub mod time_slot_list;
