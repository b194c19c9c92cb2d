pub mod answer;
pub mod ledger;
pub mod testing;
