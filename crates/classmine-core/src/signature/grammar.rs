//! Recursive descent over the class-file signature grammar.
//!
//! Every production returns its canonical string to its caller, so a frame
//! only ever reports to the one frame that started it. Root productions
//! (class and method signatures) are the only places that can produce
//! superclass, parameter, return or throws slots.

use super::buffer::SignatureBuffer;
use super::{FormalTypeParameter, SignatureError};

/// Deepest type-argument nesting accepted before the signature is rejected.
pub(crate) const MAX_NESTING: usize = 256;

pub(crate) struct ClassSignatureParts {
    pub type_parameters: Vec<FormalTypeParameter>,
    pub superclass: String,
    pub interfaces: Vec<String>,
}

pub(crate) struct MethodSignatureParts {
    pub type_parameters: Vec<FormalTypeParameter>,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub exceptions: Vec<String>,
}

pub(crate) struct Parser<'a> {
    signature: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(signature: &'a str) -> Self {
        Self {
            signature,
            bytes: signature.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<u8, SignatureError> {
        let b = self.peek().ok_or_else(|| SignatureError::Truncated {
            signature: self.signature.to_string(),
        })?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<(), SignatureError> {
        let found = self.next()?;
        if found != expected {
            return Err(self.unexpected(found));
        }
        Ok(())
    }

    fn unexpected(&self, found: u8) -> SignatureError {
        SignatureError::Unexpected {
            signature: self.signature.to_string(),
            found: found as char,
            position: self.pos.saturating_sub(1),
        }
    }

    /// Identifier up to (not including) the first byte in `stops`.
    fn identifier(&mut self, stops: &[u8]) -> Result<&'a str, SignatureError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos >= self.bytes.len() {
            return Err(SignatureError::Truncated {
                signature: self.signature.to_string(),
            });
        }
        Ok(&self.signature[start..self.pos])
    }

    pub(crate) fn end(&self) -> Result<(), SignatureError> {
        if self.pos != self.bytes.len() {
            return Err(SignatureError::Trailing {
                signature: self.signature.to_string(),
                position: self.pos,
            });
        }
        Ok(())
    }

    /// JavaTypeSignature; `void` only where a return type is legal.
    pub(crate) fn type_signature(&mut self, allow_void: bool) -> Result<String, SignatureError> {
        let mut buffer = SignatureBuffer::new();
        self.type_into(&mut buffer, allow_void)?;
        Ok(buffer.finish())
    }

    fn type_into(
        &mut self,
        buffer: &mut SignatureBuffer,
        allow_void: bool,
    ) -> Result<(), SignatureError> {
        loop {
            let b = self.next()?;
            match b {
                b'[' => buffer.add_dimension(),
                b'L' => return self.class_type_into(buffer),
                b'T' => {
                    let name = self.identifier(b";")?;
                    self.pos += 1;
                    buffer.type_variable(name);
                    return Ok(());
                }
                b'V' if allow_void => {
                    buffer.base_type("void");
                    return Ok(());
                }
                other => match base_type_name(other) {
                    Some(name) => {
                        buffer.base_type(name);
                        return Ok(());
                    }
                    None => return Err(self.unexpected(other)),
                },
            }
        }
    }

    /// ClassTypeSignature after its leading `L`.
    fn class_type_into(&mut self, buffer: &mut SignatureBuffer) -> Result<(), SignatureError> {
        let name = self.identifier(b"<.;")?;
        buffer.class_type(name);
        loop {
            match self.next()? {
                b'<' => self.type_arguments(buffer)?,
                b'.' => {
                    let inner = self.identifier(b"<.;")?;
                    buffer.inner_class_type(inner);
                }
                b';' => return Ok(()),
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn type_arguments(&mut self, buffer: &mut SignatureBuffer) -> Result<(), SignatureError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SignatureError::TooDeep {
                limit: MAX_NESTING,
                position: self.pos,
            });
        }
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    self.depth -= 1;
                    return Ok(());
                }
                Some(b'*') => {
                    self.pos += 1;
                    buffer.add_argument("<?>".to_string());
                }
                Some(w @ (b'+' | b'-')) => {
                    self.pos += 1;
                    let mut bounded = SignatureBuffer::bounded(w as char);
                    self.type_into(&mut bounded, false)?;
                    buffer.add_argument(bounded.finish());
                }
                Some(_) => {
                    let arg = self.type_signature(false)?;
                    buffer.add_argument(arg);
                }
                None => {
                    return Err(SignatureError::Truncated {
                        signature: self.signature.to_string(),
                    })
                }
            }
        }
    }

    fn formal_type_parameters(&mut self) -> Result<Vec<FormalTypeParameter>, SignatureError> {
        let mut params = Vec::new();
        if self.peek() != Some(b'<') {
            return Ok(params);
        }
        self.pos += 1;

        loop {
            let name = self.identifier(b":")?.to_string();
            self.pos += 1;
            let mut bounds = Vec::new();

            // Class bound may be empty (`T::Ljava/lang/Comparable;`).
            if !matches!(self.peek(), Some(b':') | Some(b'>')) {
                bounds.push(self.type_signature(false)?);
            }
            while self.peek() == Some(b':') {
                self.pos += 1;
                bounds.push(self.type_signature(false)?);
            }
            params.push(FormalTypeParameter { name, bounds });

            if self.peek() == Some(b'>') {
                self.pos += 1;
                return Ok(params);
            }
        }
    }

    pub(crate) fn class_signature(&mut self) -> Result<ClassSignatureParts, SignatureError> {
        let type_parameters = self.formal_type_parameters()?;
        let superclass = self.type_signature(false)?;
        let mut interfaces = Vec::new();
        while self.peek().is_some() {
            interfaces.push(self.type_signature(false)?);
        }
        Ok(ClassSignatureParts {
            type_parameters,
            superclass,
            interfaces,
        })
    }

    pub(crate) fn method_signature(&mut self) -> Result<MethodSignatureParts, SignatureError> {
        let type_parameters = self.formal_type_parameters()?;
        self.expect(b'(')?;
        let mut parameters = Vec::new();
        while self.peek() != Some(b')') {
            parameters.push(self.type_signature(false)?);
        }
        self.pos += 1;
        let return_type = self.type_signature(true)?;

        let mut exceptions = Vec::new();
        while self.peek().is_some() {
            self.expect(b'^')?;
            exceptions.push(self.type_signature(false)?);
        }

        Ok(MethodSignatureParts {
            type_parameters,
            parameters,
            return_type,
            exceptions,
        })
    }
}

fn base_type_name(descriptor: u8) -> Option<&'static str> {
    let name = match descriptor {
        b'B' => "byte",
        b'C' => "char",
        b'D' => "double",
        b'F' => "float",
        b'I' => "int",
        b'J' => "long",
        b'S' => "short",
        b'Z' => "boolean",
        _ => return None,
    };
    Some(name)
}
