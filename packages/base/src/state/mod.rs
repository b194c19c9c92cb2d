pub mod fee_receiver;
pub mod token;
