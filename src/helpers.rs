pub mod hex_view;
