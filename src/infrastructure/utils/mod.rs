pub mod get_client_ip;
pub mod html;
pub mod valid_uuid;
