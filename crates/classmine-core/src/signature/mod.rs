//! Generic signature decoding.
//!
//! Turns field descriptors, method descriptors and `Signature` attributes
//! into canonical FQN strings:
//!
//! - packages are dotted, inner classes use `$`
//! - generic arguments render as `<a,b>` after the (possibly inner) class
//! - type variables render as `<T>`
//! - arrays append `[]` per dimension after any arguments
//! - wildcards render as `<?+Bound>`, `<?-Bound>` or `<?>`
//!
//! Class and method signatures are reported through handler traits so the
//! caller can emit facts in grammar order.

mod buffer;
mod grammar;

use thiserror::Error;

use grammar::Parser;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature '{signature}' ends unexpectedly")]
    Truncated { signature: String },
    #[error("unexpected '{found}' at {position} in signature '{signature}'")]
    Unexpected {
        signature: String,
        found: char,
        position: usize,
    },
    #[error("trailing input at {position} in signature '{signature}'")]
    Trailing { signature: String, position: usize },
    #[error("empty type name")]
    Empty,
    #[error("type arguments nested deeper than {limit} at {position}")]
    TooDeep { limit: usize, position: usize },
}

/// A formal type parameter with its class and interface bounds, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalTypeParameter {
    pub name: String,
    pub bounds: Vec<String>,
}

impl FormalTypeParameter {
    /// Canonical form: `<T+bound1,bound2>`, or `<T>` without bounds.
    pub fn render(&self) -> String {
        if self.bounds.is_empty() {
            format!("<{}>", self.name)
        } else {
            format!("<{}+{}>", self.name, self.bounds.join(","))
        }
    }
}

/// Receives the parts of a class signature in grammar order.
pub trait ClassSignatureHandler {
    type Error: From<SignatureError>;

    fn type_parameters(&mut self, params: Vec<FormalTypeParameter>) -> Result<(), Self::Error>;
    fn superclass(&mut self, fqn: String) -> Result<(), Self::Error>;
    fn interface(&mut self, fqn: String) -> Result<(), Self::Error>;
}

/// Receives the parts of a method signature.
///
/// `parameters` is always called first, so the handler can finalise the
/// method's FQN before type parameters, return type and exceptions arrive.
pub trait MethodSignatureHandler {
    type Error: From<SignatureError>;

    fn parameters(&mut self, params: Vec<String>) -> Result<(), Self::Error>;
    fn type_parameters(&mut self, params: Vec<FormalTypeParameter>) -> Result<(), Self::Error>;
    fn return_type(&mut self, fqn: String) -> Result<(), Self::Error>;
    fn exception(&mut self, fqn: String) -> Result<(), Self::Error>;
}

/// Decode a single field descriptor or field type signature.
pub fn decode_type(signature: &str) -> Result<String, SignatureError> {
    let mut parser = Parser::new(signature);
    let fqn = parser.type_signature(false)?;
    parser.end()?;
    Ok(fqn)
}

/// Convert an internal class name to an FQN.
///
/// Array classes (leading `[`) go through the type grammar; everything else
/// only has its slashes replaced.
pub fn decode_class_name(internal_name: &str) -> Result<String, SignatureError> {
    if internal_name.is_empty() {
        return Err(SignatureError::Empty);
    }
    if internal_name.starts_with('[') {
        decode_type(internal_name)
    } else {
        Ok(internal_name.replace('/', "."))
    }
}

/// Last segment of an internal class name.
pub fn simple_name(internal_name: &str) -> &str {
    match internal_name.rfind('/') {
        Some(idx) => &internal_name[idx + 1..],
        None => internal_name,
    }
}

pub fn decode_class_signature<H: ClassSignatureHandler>(
    signature: &str,
    handler: &mut H,
) -> Result<(), H::Error> {
    let mut parser = Parser::new(signature);
    let parts = parser.class_signature()?;
    parser.end()?;

    handler.type_parameters(parts.type_parameters)?;
    handler.superclass(parts.superclass)?;
    for interface in parts.interfaces {
        handler.interface(interface)?;
    }
    Ok(())
}

pub fn decode_method_signature<H: MethodSignatureHandler>(
    signature: &str,
    handler: &mut H,
) -> Result<(), H::Error> {
    let mut parser = Parser::new(signature);
    let parts = parser.method_signature()?;
    parser.end()?;

    handler.parameters(parts.parameters)?;
    handler.type_parameters(parts.type_parameters)?;
    handler.return_type(parts.return_type)?;
    for exception in parts.exceptions {
        handler.exception(exception)?;
    }
    Ok(())
}

/// A fully decoded method descriptor or signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<FormalTypeParameter>,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub exceptions: Vec<String>,
}

impl MethodSignature {
    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        let mut parser = Parser::new(signature);
        let parts = parser.method_signature()?;
        parser.end()?;
        Ok(Self {
            type_parameters: parts.type_parameters,
            parameters: parts.parameters,
            return_type: parts.return_type,
            exceptions: parts.exceptions,
        })
    }

    /// Parenthesised parameter list, e.g. `(int,java.lang.String)`.
    pub fn parameter_list(&self) -> String {
        format!("({})", self.parameters.join(","))
    }

    /// FQN of a reference to this method on `owner`: `owner.name(params)`.
    pub fn reference_fqn(&self, owner_fqn: &str, name: &str) -> String {
        format!("{}.{}{}", owner_fqn, name, self.parameter_list())
    }
}

/// Render a parameter list the way method FQNs embed it.
pub fn parameter_list(params: &[String]) -> String {
    format!("({})", params.join(","))
}
