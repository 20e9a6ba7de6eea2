use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Accept ids exported either as JSON strings or as numbers.
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// A user attached to a customer account.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUser {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerUser {
    /// First and last name joined by a space; `None` when both are missing.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Internal customer record, keyed by `companyId`.
///
/// Fields the reconciler does not read are kept in `extra` so the full record
/// can be forwarded to the external scorer.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub company_id: String,
    #[serde(default)]
    pub users: Vec<CustomerUser>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone_number: Option<String>,
    #[serde(default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// User full names, then trade name, then legal name.
    pub fn name_pool(&self) -> Vec<String> {
        self.users
            .iter()
            .filter_map(CustomerUser::full_name)
            .chain(self.trade_name.iter().cloned())
            .chain(self.legal_name.iter().cloned())
            .collect()
    }

    /// User emails, then the contact email.
    pub fn email_pool(&self) -> Vec<String> {
        self.users
            .iter()
            .filter_map(|u| u.email.clone())
            .chain(self.contact_email.iter().cloned())
            .collect()
    }
}

/// Third-party bank account record.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankRecord {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub link_id: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub company_id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,

    // Fraud annotations: kept for audit, never sent to the external scorer
    #[serde(
        default,
        rename = "bankuryFraudTeamComments",
        skip_serializing_if = "Option::is_none"
    )]
    pub fraud_team_comments: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fraud: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BankRecord {
    /// Borrowed view of the record with the fraud annotations left out.
    pub fn scoring_view(&self) -> ScoringView<'_> {
        ScoringView {
            link_id: &self.link_id,
            company_id: &self.company_id,
            names: &self.names,
            emails: &self.emails,
            phone_numbers: &self.phone_numbers,
            extra: &self.extra,
        }
    }
}

/// What the external scorer is allowed to see of a bank record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringView<'a> {
    pub link_id: &'a str,
    pub company_id: &'a str,
    pub names: &'a [String],
    pub emails: &'a [String],
    pub phone_numbers: &'a [String],

    #[serde(flatten)]
    pub extra: &'a Map<String, Value>,
}
