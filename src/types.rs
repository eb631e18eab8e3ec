//! Artifacts exchanged with the engine.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Encoding of the verifying key returned by setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierFormat {
    /// JSON object, consumable by `verify`.
    #[default]
    Json,
    /// Solidity verifier contract source.
    Solidity,
}

impl VerifierFormat {
    /// String passed over the ABI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Solidity => "solidity",
        }
    }
}

impl fmt::Display for VerifierFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerifierFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "solidity" => Ok(Self::Solidity),
            other => Err(format!(
                "invalid verifier format '{}' (expected 'json' or 'solidity')",
                other
            )),
        }
    }
}

macro_rules! opaque_artifact {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(contents: impl Into<String>) -> Self {
                Self(contents.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Hex SHA-256 of the artifact, for logs and operator output.
            pub fn fingerprint(&self) -> String {
                hex::encode(Sha256::digest(self.0.as_bytes()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(contents: String) -> Self {
                Self(contents)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_artifact!(
    /// Verifying key produced by setup (JSON or Solidity source).
    VerifyingKey
);

opaque_artifact!(
    /// Proof bundled with the public inputs needed to verify it.
    ProofWithInputs
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_format_wire_strings() {
        assert_eq!(VerifierFormat::Json.as_str(), "json");
        assert_eq!(VerifierFormat::Solidity.as_str(), "solidity");
        assert_eq!("json".parse::<VerifierFormat>(), Ok(VerifierFormat::Json));
        assert_eq!(
            "solidity".parse::<VerifierFormat>(),
            Ok(VerifierFormat::Solidity)
        );
        assert!("JSON".parse::<VerifierFormat>().is_err());
        assert!("abi".parse::<VerifierFormat>().is_err());
    }

    #[test]
    fn test_verifier_format_serde() {
        let json = serde_json::to_string(&VerifierFormat::Solidity).unwrap();
        assert_eq!(json, "\"solidity\"");
        let parsed: VerifierFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(parsed, VerifierFormat::Json);
    }

    #[test]
    fn test_artifact_is_opaque_string() {
        let vk = VerifyingKey::new("{\"alpha\":1}");
        assert_eq!(vk.as_str(), "{\"alpha\":1}");
        assert_eq!(vk.to_string(), "{\"alpha\":1}");
        assert_eq!(vk.len(), 11);
        assert!(!vk.is_empty());
        assert_eq!(
            serde_json::to_string(&vk).unwrap(),
            "\"{\\\"alpha\\\":1}\""
        );
    }

    #[test]
    fn test_fingerprint() {
        let proof = ProofWithInputs::new("");
        assert_eq!(
            proof.fingerprint(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(
            ProofWithInputs::new("a").fingerprint(),
            ProofWithInputs::new("b").fingerprint()
        );
    }
}
