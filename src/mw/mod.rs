pub mod request_mw;
