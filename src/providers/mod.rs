pub mod vanguard;
pub mod yahoo_finance;
