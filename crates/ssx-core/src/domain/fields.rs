//! FieldBag - リソース記述のフィールド集合
//!
//! 29 個の名前付き文字列フィールドを持つフラットな構造体です。
//! 更新時のマージは、実行時リフレクションではなく明示的なアクセサ表
//! (`FieldBag::FIELDS`) を順に走査して行います。
//!
//! # 学習ポイント
//! - `macro_rules!` で構造体定義とアクセサ表を一箇所から生成
//! - `fn` ポインタを `const` スライスに格納

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Getter/setter pair for one named field of a [`FieldBag`].
#[derive(Clone, Copy)]
pub struct FieldAccessor {
    /// Wire name of the field.
    pub name: &'static str,
    pub get: fn(&FieldBag) -> &str,
    pub set: fn(&mut FieldBag, String),
}

impl std::fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor").field("name", &self.name).finish()
    }
}

/// A string field value; anything else becomes `""` instead of failing the whole bag.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Null => Ok(String::new()),
        other => {
            tracing::warn!(value = %other, "non-string field value ignored");
            Ok(String::new())
        }
    }
}

macro_rules! field_bag {
    ($($field:ident => $wire:literal),+ $(,)?) => {
        /// Flat set of named string attributes describing a simulated resource.
        ///
        /// Missing, `null` and non-string fields decode as empty strings; unknown
        /// fields are ignored.
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct FieldBag {
            $(
                #[serde(rename = $wire, deserialize_with = "lenient_string")]
                pub $field: String,
            )+
        }

        impl FieldBag {
            /// Accessors for every field, in wire order.
            pub const FIELDS: &'static [FieldAccessor] = &[
                $(
                    FieldAccessor {
                        name: $wire,
                        get: {
                            fn get(bag: &FieldBag) -> &str {
                                &bag.$field
                            }
                            get
                        },
                        set: {
                            fn set(bag: &mut FieldBag, value: String) {
                                bag.$field = value;
                            }
                            set
                        },
                    },
                )+
            ];
        }
    };
}

field_bag! {
    customer => "CUSTOMER",
    sra_environment => "SRAEnvironment",
    domain_number => "domainNumber",
    os_name => "OSName",
    host_environment => "HostEnvironment",
    site_id => "SiteID",
    cpu_count => "CPUcount",
    memory_gb => "MemoryGB",
    ci_support_tier => "CISupportTier",
    ci_impact => "CIImpact",
    function => "Function",
    server_count => "serverCount",
    backup_type => "BackupType",
    disk0_size_gb => "disk0SizeGB",
    disk1_size_gb => "disk1SizeGB",
    disks_allowed => "disksAllowed",
    outage_day => "OutageDay",
    outage_window => "OutageWindow",
    managed_by => "managedBy",
    offering_name => "offeringName",
    subscription_email => "subscriptionEmail",
    subscription_name => "subscriptionName",
    requestor_user => "requestorUser",
    requestor_email => "requestorEmail",
    requestor_name => "requestorName",
    requestor_group => "requestorGroup",
    reference => "Reference",
    subscription_id => "SubscriptionID",
    service_request_id => "serviceRequestId",
}

impl FieldBag {
    /// Look up an accessor by wire name.
    pub fn accessor(name: &str) -> Option<&'static FieldAccessor> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }

    /// Value of the field with the given wire name.
    pub fn get(&self, name: &str) -> Option<&str> {
        Self::accessor(name).map(|field| (field.get)(self))
    }

    /// Set the field with the given wire name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match Self::accessor(name) {
            Some(field) => {
                (field.set)(self, value.into());
                true
            }
            None => false,
        }
    }

    /// Build a bag from a loose string map keyed by wire names.
    ///
    /// Unknown keys are dropped.
    pub fn from_map(input: &HashMap<String, String>) -> Self {
        let mut bag = Self::default();
        for field in Self::FIELDS {
            if let Some(value) = input.get(field.name) {
                (field.set)(&mut bag, value.clone());
            }
        }
        bag
    }

    /// Overwrite every field for which `incoming` carries a non-empty value.
    ///
    /// Empty incoming fields keep the current value.
    pub fn merge_from(&mut self, incoming: &FieldBag) {
        for field in Self::FIELDS {
            let value = (field.get)(incoming);
            if !value.is_empty() {
                (field.set)(self, value.to_string());
            }
        }
    }

    /// Serialize to the JSON string stored in a record output.
    ///
    /// Encoding failures are logged and yield an empty string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to encode field bag");
            String::new()
        })
    }

    /// Parse a stored output value.
    ///
    /// Unparseable input is logged and treated as an empty bag.
    pub fn from_json_or_empty(value: &str) -> Self {
        serde_json::from_str(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored output is not a field bag; using empty base");
            Self::default()
        })
    }
}
