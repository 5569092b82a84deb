//! Serialize/deserialize round trips keep every field, ids included

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use rusty_ledger::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

fn date() -> Timestamp {
    Utc.with_ymd_and_hms(2011, 1, 3, 14, 30, 15).unwrap()
}

fn round_trip<T: Serialize + DeserializeOwned>(value: &T) -> T {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_share_transaction_survives_two_round_trips() {
    let factory = TransactionFactory::new(123);
    let original = factory
        .construct_buy("DE", date(), dec!(5), dec!(10.125), dec!(7.95))
        .unwrap();

    let once = round_trip(&original);
    let twice = round_trip(&once);

    assert_eq!(once, original);
    assert_eq!(twice, original);
    assert_eq!(twice.id(), original.id());
    assert_eq!(twice.price().to_string(), "10.125");
    assert_eq!(twice.total_value(), original.total_value());
}

#[test]
fn test_cash_transaction_round_trip() {
    let factory = TransactionFactory::new(123);
    let original = factory.construct_withdrawal(date(), dec!(1000)).unwrap();
    let back = round_trip(&round_trip(&original));
    assert_eq!(back, original);
    assert_eq!(back.amount(), dec!(-1000));
}

#[test]
fn test_transaction_enum_round_trip() {
    let factory = TransactionFactory::new(123);
    let transactions: Vec<Transaction> = vec![
        factory.construct_deposit(date(), dec!(500)).unwrap().into(),
        factory
            .construct_sell("DE", date(), dec!(2), dec!(80), dec!(1))
            .unwrap()
            .into(),
    ];
    assert_eq!(round_trip(&transactions), transactions);
}

#[test]
fn test_accounts_round_trip() {
    let factory = TransactionFactory::new(9);
    let mut plain = CashAccount::new(factory);
    plain.deposit(date(), dec!(500)).unwrap();
    plain.withdraw(date(), dec!(125.50)).unwrap();
    let back = round_trip(&plain);
    assert_eq!(back, plain);
    assert_eq!(back.cash_balance(date()), dec!(374.50));

    let mut margin = MarginableCashAccount::new(factory, dec!(100)).unwrap();
    margin.withdraw(date(), dec!(60)).unwrap();
    let back = round_trip(&round_trip(&margin));
    assert_eq!(back, margin);
    assert_eq!(back.maximum_margin(), dec!(100));

    // the restored factory keeps producing the same ids
    let a = back.factory().construct_deposit(date(), dec!(1)).unwrap();
    let b = factory.construct_deposit(date(), dec!(1)).unwrap();
    assert_eq!(a.id(), b.id());
}

#[test]
fn test_portfolio_and_holding_round_trip() {
    let factory = TransactionFactory::new(9);
    let mut portfolio = Portfolio::new(CashAccount::new(factory));
    portfolio.record(factory.construct_deposit(date(), dec!(500)).unwrap().into());
    portfolio.record(
        factory
            .construct_buy("DE", date(), dec!(3), dec!(50), dec!(1))
            .unwrap()
            .into(),
    );
    assert_eq!(round_trip(&portfolio), portfolio);

    let holding =
        HoldingFactory::construct_holding(dec!(5), dec!(10), dec!(20), dec!(2), dec!(3)).unwrap();
    assert_eq!(round_trip(&holding), holding);
}

#[test]
fn test_tampered_payload_rejected() {
    let factory = TransactionFactory::new(9);
    let buy = factory
        .construct_buy("DE", date(), dec!(3), dec!(50), dec!(1))
        .unwrap();

    let mut value = serde_json::to_value(&buy).unwrap();
    value["shares"] = serde_json::json!("0");
    let err = serde_json::from_value::<ShareTransaction>(value).unwrap_err();
    assert!(err.to_string().contains("shares must be greater than zero"));
}

#[test]
fn test_negative_margin_payload_rejected() {
    let factory = TransactionFactory::new(9);
    let account = MarginableCashAccount::new(factory, dec!(100)).unwrap();

    let mut value = serde_json::to_value(&account).unwrap();
    value["maximum_margin"] = serde_json::json!("-50");
    let err = serde_json::from_value::<MarginableCashAccount>(value).unwrap_err();
    assert!(err.to_string().contains("maximum margin must not be negative"));
}
