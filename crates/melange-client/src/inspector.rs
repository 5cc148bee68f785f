//! Operation descriptors and capability discovery
//!
//! Operations are described by static data rather than discovered from live
//! method signatures: each typed client declares an [`OperationSpec`] per
//! operation, listing its parameters in declaration order. A
//! [`MethodSignature`] view splits those parameters into required and
//! optional ones and renders the usage line shown by the CLI, and a
//! [`CapabilityRegistry`] enumerates the public operations of a client.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::client_trait::ResourceClient;
use crate::error::MelangeError;

/// Name of an implicit receiver parameter; dropped from signatures
pub const RECEIVER: &str = "self";

/// Prefix marking an operation as internal
pub const PRIVATE_MARKER: char = '_';

/// One parameter of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Keyword name of the parameter
    pub name: &'static str,
    /// Whether the parameter may be omitted
    pub optional: bool,
    /// Default rendered for an omitted parameter; `None` means "unset"
    pub default: Option<&'static str>,
}

impl ParamSpec {
    /// A parameter the caller must supply
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
            default: None,
        }
    }

    /// A parameter that is left unset when omitted
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optional: true,
            default: None,
        }
    }

    /// A parameter that falls back to `default` when omitted
    pub const fn with_default(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            optional: true,
            default: Some(default),
        }
    }
}

/// Static descriptor of one client operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Operation name (e.g. `create`)
    pub name: &'static str,
    /// Parameters in declaration order
    pub params: &'static [ParamSpec],
}

impl OperationSpec {
    /// Describe an operation
    pub const fn new(name: &'static str, params: &'static [ParamSpec]) -> Self {
        Self { name, params }
    }

    /// Signature view of this operation
    pub fn signature(&self) -> MethodSignature<'static> {
        MethodSignature::new(self.name, self.params)
    }

    /// Whether this operation is internal to the client
    pub fn is_private(&self) -> bool {
        self.name.starts_with(PRIVATE_MARKER)
    }
}

/// Required/optional view of an operation's parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature<'a> {
    name: &'a str,
    params: &'a [ParamSpec],
}

impl<'a> MethodSignature<'a> {
    /// Build a signature, dropping a leading receiver parameter if present
    pub fn new(name: &'a str, params: &'a [ParamSpec]) -> Self {
        let params = match params.split_first() {
            Some((first, rest)) if first.name == RECEIVER => rest,
            _ => params,
        };
        Self { name, params }
    }

    /// Name of the operation
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Names of parameters without a default, in declaration order
    pub fn required(&self) -> Vec<&'a str> {
        self.params
            .iter()
            .filter(|param| !param.optional)
            .map(|param| param.name)
            .collect()
    }

    /// `(name, default)` pairs of optional parameters, in declaration order
    pub fn optional(&self) -> Vec<(&'a str, Option<&'a str>)> {
        self.params
            .iter()
            .filter(|param| param.optional)
            .map(|param| (param.name, param.default))
            .collect()
    }

    /// Usage line: `"<name> <req>=<req> ... [<opt>=<opt>] ..."`
    pub fn describe(&self) -> String {
        let required = self
            .required()
            .into_iter()
            .map(|name| format!("{name}=<{name}>"));
        let optional = self
            .optional()
            .into_iter()
            .map(|(name, _)| format!("[{name}=<{name}>]"));

        std::iter::once(self.name.to_string())
            .chain(required)
            .chain(optional)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check supplied keywords against this signature
    ///
    /// # Returns
    /// * `Err(MelangeError::Usage)` - A required keyword is missing or an
    ///   unknown keyword was supplied
    pub fn validate(&self, args: &Arguments) -> Result<(), MelangeError> {
        let missing: Vec<&str> = self
            .required()
            .into_iter()
            .filter(|name| !args.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(MelangeError::usage(format!(
                "{}: missing required argument(s): {}",
                self.name,
                missing.join(", ")
            )));
        }

        let unexpected: Vec<&str> = args
            .keys()
            .filter(|key| !self.params.iter().any(|param| param.name == *key))
            .collect();
        if !unexpected.is_empty() {
            return Err(MelangeError::usage(format!(
                "{}: unexpected keyword argument(s): {}",
                self.name,
                unexpected.join(", ")
            )));
        }

        Ok(())
    }
}

/// Keyword arguments for a dynamic invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(BTreeMap<String, String>);

impl Arguments {
    /// Empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder style)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an argument, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Whether `key` was supplied
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Supplied keywords, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Value of an optional argument
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of a required argument
    pub fn required(&self, key: &str) -> Result<&str, MelangeError> {
        self.get(key)
            .ok_or_else(|| MelangeError::usage(format!("missing required argument: {key}")))
    }

    /// Parse an optional argument
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, MelangeError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| MelangeError::usage(format!("invalid value for {key}: {raw} ({e})")))
            })
            .transpose()
    }

    /// Parse a required argument
    pub fn parse_required<T>(&self, key: &str) -> Result<T, MelangeError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.parse(key)?
            .ok_or_else(|| MelangeError::usage(format!("missing required argument: {key}")))
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Public operations of one client
pub struct CapabilityRegistry<'a> {
    client: &'a dyn ResourceClient,
    operations: BTreeMap<&'static str, &'static OperationSpec>,
}

impl<'a> CapabilityRegistry<'a> {
    /// Enumerate the public operations of `client`
    pub fn new(client: &'a dyn ResourceClient) -> Self {
        let operations = client
            .operations()
            .iter()
            .filter(|operation| !operation.is_private())
            .map(|operation| (operation.name, operation))
            .collect();
        Self { client, operations }
    }

    /// Operation name to descriptor, sorted by name
    pub fn list_operations(&self) -> &BTreeMap<&'static str, &'static OperationSpec> {
        &self.operations
    }

    /// Look up a public operation
    pub fn find(&self, name: &str) -> Result<&'static OperationSpec, MelangeError> {
        self.operations
            .get(name)
            .copied()
            .ok_or_else(|| MelangeError::UnknownCapability {
                owner: self.client.name().to_string(),
                name: name.to_string(),
            })
    }

    /// Usage line of every public operation
    pub fn describe(&self) -> Vec<String> {
        self.operations
            .values()
            .map(|operation| operation.signature().describe())
            .collect()
    }

    /// Resolve, validate and invoke an operation
    pub async fn invoke(&self, name: &str, args: &Arguments) -> Result<Option<Value>, MelangeError> {
        let operation = self.find(name)?;
        operation.signature().validate(args)?;
        self.client.invoke(operation.name, args).await
    }
}

impl fmt::Debug for CapabilityRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("client", &self.client.name())
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}
