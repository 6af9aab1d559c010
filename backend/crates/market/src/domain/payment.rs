//! Payment descriptors and the gateway seam
//!
//! The market only produces a [`PaymentRequest`]; talking to a provider is
//! left to a [`PaymentGateway`] implementation.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// An item handed to [`LineItemList::new`] had no price
    #[error("Item `{0}` has no price")]
    MissingPrice(String),

    /// The items add up to more than a decimal can hold
    #[error("Order total is too large")]
    AmountOverflow,

    /// The provider rejected or failed the payment
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

/// Anything that can become a receipt line
pub trait Priceable {
    fn description(&self) -> String;

    fn price(&self) -> Option<Decimal>;

    fn quantity(&self) -> Decimal {
        Decimal::ONE
    }
}

/// One receipt line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub price: Decimal,
    pub quantity: Decimal,
}

impl LineItem {
    /// Price times quantity, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// Priced items; construction fails if any item lacks a price or the
/// total does not fit in a decimal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineItemList {
    items: Vec<LineItem>,
    #[serde(skip)]
    total: Decimal,
}

impl LineItemList {
    pub fn new<I>(items: I) -> Result<Self, PaymentError>
    where
        I: IntoIterator,
        I::Item: Priceable,
    {
        let items = items
            .into_iter()
            .map(|item| {
                let description = item.description();
                let price = item
                    .price()
                    .ok_or_else(|| PaymentError::MissingPrice(description.clone()))?;
                Ok(LineItem {
                    description,
                    price,
                    quantity: item.quantity(),
                })
            })
            .collect::<Result<Vec<_>, PaymentError>>()?;

        let total = items.iter().try_fold(Decimal::ZERO, |sum, item| {
            item.subtotal()
                .and_then(|subtotal| sum.checked_add(subtotal))
                .ok_or(PaymentError::AmountOverflow)
        })?;

        Ok(Self { items, total })
    }

    /// Sum of price times quantity; zero for an empty list
    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub value: Decimal,
    /// Currency code, e.g. `RUB`
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDetails {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Taxpayer number, when the receipt needs one
    pub inn: Option<String>,
}

/// How the customer confirms the payment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Confirmation {
    Redirect { return_url: String },
}

/// Everything a gateway needs to create a payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    amount: Amount,
    pub confirmation: Confirmation,
    pub description: String,
    pub customer: CustomerDetails,
    pub items: LineItemList,
}

impl PaymentRequest {
    /// The amount is always the total of `items`
    pub fn new(
        items: LineItemList,
        currency: impl Into<String>,
        customer: CustomerDetails,
        confirmation: Confirmation,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: Amount {
                value: items.total(),
                currency: currency.into(),
            },
            confirmation,
            description: description.into(),
            customer,
            items,
        }
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }
}

/// Payment provider client
#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    /// Create a payment and return the provider's payment id
    async fn create_payment(&self, request: &PaymentRequest) -> Result<String, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(&'static str, Option<Decimal>);

    impl Priceable for Item {
        fn description(&self) -> String {
            self.0.to_string()
        }

        fn price(&self) -> Option<Decimal> {
            self.1
        }
    }

    #[test]
    fn test_total() {
        let list = LineItemList::new([
            Item("A", Some(Decimal::new(105, 1))),
            Item("B", Some(Decimal::new(45, 1))),
        ])
        .unwrap();

        assert_eq!(list.total(), Decimal::new(15, 0));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_empty_total_is_zero() {
        let list = LineItemList::new(Vec::<Item>::new()).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.total(), Decimal::ZERO);
    }

    #[test]
    fn test_missing_price() {
        let err = LineItemList::new([
            Item("A", Some(Decimal::new(105, 1))),
            Item("B", None),
        ])
        .unwrap_err();
        assert!(matches!(err, PaymentError::MissingPrice(ref name) if name == "B"));
    }

    #[test]
    fn test_total_overflow() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let err = LineItemList::new([Item("A", Some(half)), Item("B", Some(half))]).unwrap_err();
        assert!(matches!(err, PaymentError::AmountOverflow));

        let list = LineItemList::new([Item("A", Some(half))]).unwrap();
        assert_eq!(list.total(), half);
    }

    #[test]
    fn test_request_amount_follows_items() {
        let items = LineItemList::new([Item("A", Some(Decimal::new(199, 2)))]).unwrap();
        let request = PaymentRequest::new(
            items,
            "RUB",
            CustomerDetails {
                full_name: "Ivan Ivanov".to_string(),
                email: "ivan@example.com".to_string(),
                phone: None,
                inn: None,
            },
            Confirmation::Redirect {
                return_url: "https://example.com/return".to_string(),
            },
            "Order",
        );

        assert_eq!(request.amount().value, Decimal::new(199, 2));
        assert_eq!(request.amount().currency, "RUB");

        let json = serde_json::to_value(&request.confirmation).unwrap();
        assert_eq!(json["type"], "redirect");
    }
}
