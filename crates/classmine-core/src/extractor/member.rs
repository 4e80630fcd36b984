//! Field and method declarations.

use tracing::{debug, info};

use crate::classfile::{FieldInfo, MethodInfo};
use crate::error::ExtractError;
use crate::ontology::{EntityFact, EntityKind, LocalVariableFact, RelationKind};
use crate::scope::ScopeKind;
use crate::signature::{
    decode_class_name, decode_method_signature, decode_type, parameter_list, FormalTypeParameter,
    MethodSignature, MethodSignatureHandler,
};
use crate::sink::FactSink;

use super::annotation::emit_annotation;
use super::code::extract_body;
use super::context::ExtractionContext;

pub(crate) fn extract_field<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    field: &FieldInfo,
) -> Result<(), ExtractError> {
    if field.is_synthetic() {
        debug!(field = %field.name, "Skipping synthetic field");
        return Ok(());
    }

    let kind = if field.is_enum_constant() {
        EntityKind::EnumConstant
    } else {
        EntityKind::Field
    };

    let owner = ctx.scope.current_fqn()?.to_string();
    let fqn = format!("{}.{}", owner, field.name);

    ctx.entity(
        EntityFact::new(kind, fqn.clone(), ctx.location.clone())
            .with_name(field.name.clone())
            .with_modifiers(field.access),
    )?;
    ctx.relation(RelationKind::Inside, fqn.clone(), owner)?;

    let held = decode_type(field.signature.as_deref().unwrap_or(&field.descriptor))?;
    ctx.relation(RelationKind::Holds, fqn.clone(), held)?;

    // Compile-time constants are written by the declaration itself.
    if field.constant_value.is_some() {
        ctx.relation(RelationKind::Writes, fqn.clone(), fqn.clone())?;
    }

    for annotation in &field.annotations {
        emit_annotation(ctx, &fqn, &fqn, annotation)?;
    }
    for name in &field.unknown_attributes {
        info!(field = %fqn, attribute = %name, "Unrecognized field attribute");
    }
    Ok(())
}

fn classify_method<S: FactSink + ?Sized>(
    ctx: &ExtractionContext<'_, S>,
    method: &MethodInfo,
) -> Result<EntityKind, ExtractError> {
    let kind = match method.name.as_str() {
        "<clinit>" => EntityKind::Initializer,
        "<init>" => EntityKind::Constructor,
        _ if ctx.scope.current_kind()? == ScopeKind::Entity(EntityKind::Annotation) => {
            EntityKind::AnnotationElement
        }
        _ => EntityKind::Method,
    };
    Ok(kind)
}

pub(crate) fn extract_method<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    method: &MethodInfo,
) -> Result<(), ExtractError> {
    if method.is_bridge() {
        debug!(method = %method.name, "Skipping bridge method");
        return Ok(());
    }

    let kind = classify_method(ctx, method)?;
    let owner = ctx.scope.current_fqn()?.to_string();
    let raw = MethodSignature::parse(&method.descriptor)?.parameter_list();

    let mut declaration = MethodDeclaration {
        ctx: &mut *ctx,
        kind,
        owner: &owner,
        name: &method.name,
        fqn: None,
        parameters: String::new(),
        exceptions: 0,
    };
    let generic = match &method.signature {
        None => {
            decode_method_signature(&method.descriptor, &mut declaration)?;
            None
        }
        Some(signature) => {
            decode_method_signature(signature, &mut declaration)?;
            Some(declaration.parameters.clone())
        }
    };

    // Raw descriptors never carry throws; generic ones may omit them.
    if declaration.exceptions == 0 {
        for exception in &method.exceptions {
            let exception = decode_class_name(exception)?;
            declaration.exception(exception)?;
        }
    }
    let fqn = declaration.fqn.take().unwrap_or_default();

    ctx.entity(
        EntityFact::new(kind, fqn.clone(), ctx.location.clone())
            .with_name(method.name.clone())
            .with_modifiers(method.access)
            .with_signatures(raw, generic),
    )?;

    if method.has_annotation_default {
        debug!(method = %fqn, "Ignoring annotation default value");
    }
    for name in &method.unknown_attributes {
        info!(method = %fqn, attribute = %name, "Unrecognized method attribute");
    }

    extract_body(ctx, &fqn, method)?;

    ctx.scope.pop()?;
    Ok(())
}

/// Receives a method descriptor or signature.
///
/// Parameters arrive first: the method FQN is finalised and its frame pushed
/// before type parameters, return type and exceptions are emitted against it.
struct MethodDeclaration<'c, 's, S: FactSink + ?Sized> {
    ctx: &'c mut ExtractionContext<'s, S>,
    kind: EntityKind,
    owner: &'c str,
    name: &'c str,
    fqn: Option<String>,
    parameters: String,
    exceptions: usize,
}

impl<S: FactSink + ?Sized> MethodSignatureHandler for MethodDeclaration<'_, '_, S> {
    type Error = ExtractError;

    fn parameters(&mut self, params: Vec<String>) -> Result<(), ExtractError> {
        self.parameters = parameter_list(&params);
        let fqn = format!("{}.{}{}", self.owner, self.name, self.parameters);

        self.ctx.relation(RelationKind::Inside, fqn.clone(), self.owner)?;
        self.ctx.scope.push(fqn.clone(), ScopeKind::Entity(self.kind));

        for (position, param) in params.into_iter().enumerate() {
            let fact = LocalVariableFact::param(
                fqn.clone(),
                position,
                param,
                self.ctx.location.clone(),
            );
            self.ctx.local_variable(fact)?;
        }

        self.fqn = Some(fqn);
        Ok(())
    }

    fn type_parameters(&mut self, params: Vec<FormalTypeParameter>) -> Result<(), ExtractError> {
        for param in params {
            self.ctx
                .relation_from_scope(RelationKind::ParametrizedBy, param.render())?;
        }
        Ok(())
    }

    fn return_type(&mut self, fqn: String) -> Result<(), ExtractError> {
        match self.kind {
            EntityKind::Constructor | EntityKind::Initializer => Ok(()),
            _ => self.ctx.relation_from_scope(RelationKind::Returns, fqn),
        }
    }

    fn exception(&mut self, fqn: String) -> Result<(), ExtractError> {
        self.exceptions += 1;
        self.ctx.relation_from_scope(RelationKind::Throws, fqn)
    }
}
