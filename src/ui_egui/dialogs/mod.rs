pub mod booking_dialog;
