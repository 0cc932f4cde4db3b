use serde::{Deserialize, Serialize};

/// Error body returned by every non-success response of the backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod account {
    use super::*;

    /// Discriminator of an account record.
    ///
    /// The backend stores it as a free-form string, so records are kept with
    /// the raw value and classified with [`Role::from_wire`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Role {
        User,
        ServiceProvider,
        Admin,
    }

    impl Role {
        /// Returns the canonical role string used by the backend.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::User => "user",
                Self::ServiceProvider => "serviceProvider",
                Self::Admin => "admin",
            }
        }

        /// Parses a raw discriminator. Matching is exact, like the backend.
        pub fn from_wire(raw: &str) -> Option<Self> {
            match raw {
                "user" => Some(Self::User),
                "serviceProvider" => Some(Self::ServiceProvider),
                "admin" => Some(Self::Admin),
                _ => None,
            }
        }
    }

    /// An account as stored by the backend.
    ///
    /// Every field is optional. Scalars of the wrong JSON type (a phone
    /// number sent as a number, for example) are read as text; `null` and
    /// nested values are read as absent. Older documents use alternate key
    /// names (`name`, `contact`, `zipCode`, `category`, ...); when a record
    /// carries several of them the first non-blank one wins.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(from = "WireAccount", rename_all = "camelCase")]
    pub struct AccountRecord {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub role: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub full_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub state: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub zip: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub business_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub service_category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        /// Creation timestamp as sent by the backend (usually RFC3339).
        #[serde(skip_serializing_if = "Option::is_none")]
        pub created_at: Option<String>,
    }

    impl AccountRecord {
        /// Classified discriminator, `None` when missing or unrecognized.
        pub fn role(&self) -> Option<Role> {
            self.role.as_deref().and_then(Role::from_wire)
        }
    }

    /// Raw document with every accepted key kept apart, so that a record
    /// carrying both `_id` and `id` (or `serviceCategory` and `category`)
    /// still decodes.
    #[derive(Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct WireAccount {
        #[serde(rename = "_id", deserialize_with = "lenient::string")]
        object_id: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        id: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        role: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        full_name: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        name: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        email: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        phone: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        contact: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        phone_number: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        city: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        state: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        zip: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        zip_code: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        business_name: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        service_category: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        service_type: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        category: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        status: Option<String>,
        #[serde(deserialize_with = "lenient::string")]
        created_at: Option<String>,
    }

    impl From<WireAccount> for AccountRecord {
        fn from(wire: WireAccount) -> Self {
            Self {
                id: first_present([wire.object_id, wire.id]),
                role: wire.role,
                full_name: first_present([wire.full_name, wire.name]),
                email: wire.email,
                phone: first_present([wire.phone, wire.contact, wire.phone_number]),
                city: wire.city,
                state: wire.state,
                zip: first_present([wire.zip, wire.zip_code]),
                business_name: wire.business_name,
                service_category: first_present([
                    wire.service_category,
                    wire.service_type,
                    wire.category,
                ]),
                status: wire.status,
                created_at: wire.created_at,
            }
        }
    }

    /// First candidate with visible text, else the first one given.
    fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
        let mut candidates = candidates.into_iter();
        let primary = candidates.next().flatten();
        if primary.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            return primary;
        }
        candidates
            .flatten()
            .find(|v| !v.trim().is_empty())
            .or(primary)
    }

    /// Response body of the account listing endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub count: usize,
        pub data: Vec<AccountRecord>,
    }

    /// Response body of the single account endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountResponse {
        #[serde(default)]
        pub success: bool,
        pub data: AccountRecord,
    }

    mod lenient {
        use serde::{Deserialize, Deserializer, de::IgnoredAny};

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Integer(i64),
            Float(f64),
            Flag(bool),
            Other(IgnoredAny),
        }

        pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<Scalar>::deserialize(deserializer)?;
            Ok(match value {
                Some(Scalar::Text(text)) => Some(text),
                Some(Scalar::Integer(number)) => Some(number.to_string()),
                Some(Scalar::Float(number)) => Some(number.to_string()),
                Some(Scalar::Flag(flag)) => Some(flag.to_string()),
                Some(Scalar::Other(_)) | None => None,
            })
        }
    }
}
