//! Stack of open lexical scopes during a class-file pass.
//!
//! Frames are pushed for the package, the type being visited and the method
//! whose body is being visited. The top frame supplies the FQN every emitted
//! fact is qualified with.

use thiserror::Error;

use crate::ontology::EntityKind;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("scope stack underflow")]
    Underflow,
    #[error("no open scope")]
    Empty,
}

/// What a frame stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Entity(EntityKind),
    /// A declaration with no emittable entity (package-info, module-info).
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    pub fqn: String,
    pub containment_emitted: bool,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    pushes: usize,
    pops: usize,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fqn: impl Into<String>, kind: ScopeKind) {
        self.frames.push(ScopeFrame {
            kind,
            fqn: fqn.into(),
            containment_emitted: false,
        });
        self.pushes += 1;
    }

    pub fn pop(&mut self) -> Result<ScopeFrame, ScopeError> {
        let frame = self.frames.pop().ok_or(ScopeError::Underflow)?;
        self.pops += 1;
        Ok(frame)
    }

    fn top(&self) -> Result<&ScopeFrame, ScopeError> {
        self.frames.last().ok_or(ScopeError::Empty)
    }

    pub fn current_fqn(&self) -> Result<&str, ScopeError> {
        self.top().map(|f| f.fqn.as_str())
    }

    pub fn current_kind(&self) -> Result<ScopeKind, ScopeError> {
        self.top().map(|f| f.kind)
    }

    pub fn mark_containment_emitted(&mut self) -> Result<(), ScopeError> {
        let frame = self.frames.last_mut().ok_or(ScopeError::Empty)?;
        frame.containment_emitted = true;
        Ok(())
    }

    pub fn containment_emitted(&self) -> Result<bool, ScopeError> {
        self.top().map(|f| f.containment_emitted)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Discard frames above `depth`, e.g. after an aborted class pass.
    ///
    /// Discarded frames are not counted as pops.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    pub fn push_count(&self) -> usize {
        self.pushes
    }

    pub fn pop_count(&self) -> usize {
        self.pops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_balance() {
        let mut stack = ScopeStack::new();
        stack.push("pkg", ScopeKind::Entity(EntityKind::Package));
        stack.push("pkg.A", ScopeKind::Entity(EntityKind::Class));
        assert_eq!(stack.current_fqn().unwrap(), "pkg.A");
        assert_eq!(
            stack.current_kind().unwrap(),
            ScopeKind::Entity(EntityKind::Class)
        );

        let frame = stack.pop().unwrap();
        assert_eq!(frame.fqn, "pkg.A");
        stack.pop().unwrap();
        assert_eq!(stack.push_count(), stack.pop_count());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_underflow() {
        let mut stack = ScopeStack::new();
        assert!(matches!(stack.pop(), Err(ScopeError::Underflow)));
        assert!(matches!(stack.current_fqn(), Err(ScopeError::Empty)));
    }

    #[test]
    fn test_containment_flag_is_per_frame() {
        let mut stack = ScopeStack::new();
        stack.push("pkg", ScopeKind::Entity(EntityKind::Package));
        stack.push("pkg.A$1", ScopeKind::Entity(EntityKind::Class));
        stack.mark_containment_emitted().unwrap();
        assert!(stack.containment_emitted().unwrap());
        stack.pop().unwrap();
        assert!(!stack.containment_emitted().unwrap());
    }

    #[test]
    fn test_truncate_restores_depth() {
        let mut stack = ScopeStack::new();
        stack.push("pkg", ScopeKind::Entity(EntityKind::Package));
        stack.push("pkg.A", ScopeKind::Entity(EntityKind::Class));
        stack.push("pkg.A.m()", ScopeKind::Entity(EntityKind::Method));
        stack.truncate(1);
        assert_eq!(stack.current_fqn().unwrap(), "pkg");
    }
}
