pub mod pull_request_item;
pub mod pull_request_list;
