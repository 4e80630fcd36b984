//! Assembles class files and jars for tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MODULE: u16 = 0x8000;

pub const ALOAD_0: u8 = 0x2a;
pub const RETURN: u8 = 0xb1;
pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const NEW: u8 = 0xbb;
pub const CHECKCAST: u8 = 0xc0;
pub const INSTANCEOF: u8 = 0xc1;

/// One bytecode instruction, with symbolic operands.
#[derive(Debug, Clone)]
pub enum Insn {
    Raw(Vec<u8>),
    Field(u8, String, String, String),
    Method(u8, String, String, String),
    Interface(String, String, String, u8),
    InvokeDynamic,
    Type(u8, String),
}

pub fn field_insn(op: u8, owner: &str, name: &str, desc: &str) -> Insn {
    Insn::Field(op, owner.into(), name.into(), desc.into())
}

pub fn method_insn(op: u8, owner: &str, name: &str, desc: &str) -> Insn {
    Insn::Method(op, owner.into(), name.into(), desc.into())
}

pub fn type_insn(op: u8, name: &str) -> Insn {
    Insn::Type(op, name.into())
}

#[derive(Debug, Clone)]
pub enum Element {
    Int(i32),
    Enum(String, String),
    Array(Vec<Element>),
    Nested(Ann),
}

#[derive(Debug, Clone)]
pub struct Ann {
    pub descriptor: String,
    pub elements: Vec<(String, Element)>,
}

impl Ann {
    pub fn new(descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.into(),
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, name: &str, value: Element) -> Self {
        self.elements.push((name.into(), value));
        self
    }
}

/// `depth` arrays wrapped around a single int.
pub fn nested_array(depth: usize) -> Element {
    let mut value = Element::Int(1);
    for _ in 0..depth {
        value = Element::Array(vec![value]);
    }
    value
}

/// Field signature with `depth` levels of type arguments, `a<a<...>>`.
pub fn nested_generic_signature(depth: usize) -> String {
    format!("{}La;{}", "La<".repeat(depth), ">;".repeat(depth))
}

#[derive(Debug, Clone)]
pub enum Constant {
    Int(i32),
    Str(String),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    constant: Option<Constant>,
    annotations: Vec<Ann>,
}

impl FieldSpec {
    pub fn new(access: u16, name: &str, descriptor: &str) -> Self {
        Self {
            access,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
            constant: None,
            annotations: Vec::new(),
        }
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn constant(mut self, value: Constant) -> Self {
        self.constant = Some(value);
        self
    }

    pub fn annotation(mut self, ann: Ann) -> Self {
        self.annotations.push(ann);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodSpec {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Vec<String>,
    code: Option<Vec<Insn>>,
    annotations: Vec<Ann>,
    parameter_annotations: Vec<Vec<Ann>>,
    annotation_default: bool,
    custom_attribute: Option<String>,
}

impl MethodSpec {
    pub fn new(access: u16, name: &str, descriptor: &str) -> Self {
        Self {
            access,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
            exceptions: Vec::new(),
            code: None,
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
            annotation_default: false,
            custom_attribute: None,
        }
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn throws(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.into());
        self
    }

    /// Body; a trailing `return` is appended.
    pub fn code(mut self, insns: Vec<Insn>) -> Self {
        self.code = Some(insns);
        self
    }

    pub fn annotation(mut self, ann: Ann) -> Self {
        self.annotations.push(ann);
        self
    }

    pub fn parameter_annotation(mut self, index: usize, ann: Ann) -> Self {
        if self.parameter_annotations.len() <= index {
            self.parameter_annotations.resize_with(index + 1, Vec::new);
        }
        self.parameter_annotations[index].push(ann);
        self
    }

    pub fn annotation_default(mut self) -> Self {
        self.annotation_default = true;
        self
    }

    pub fn custom_attribute(mut self, name: &str) -> Self {
        self.custom_attribute = Some(name.into());
        self
    }
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    index: HashMap<Vec<u8>, u16>,
    next: u16,
}

impl Pool {
    fn add(&mut self, entry: Vec<u8>, slots: u16) -> u16 {
        if let Some(&idx) = self.index.get(&entry) {
            return idx;
        }
        if self.next == 0 {
            self.next = 1;
        }
        let idx = self.next;
        self.next += slots;
        self.bytes.extend_from_slice(&entry);
        self.index.insert(entry, idx);
        idx
    }

    fn utf8(&mut self, s: &str) -> u16 {
        let mut e = vec![1];
        e.extend_from_slice(&(s.len() as u16).to_be_bytes());
        e.extend_from_slice(s.as_bytes());
        self.add(e, 1)
    }

    fn with_index(&mut self, tag: u8, idx: u16) -> u16 {
        let mut e = vec![tag];
        e.extend_from_slice(&idx.to_be_bytes());
        self.add(e, 1)
    }

    fn class(&mut self, name: &str) -> u16 {
        let n = self.utf8(name);
        self.with_index(7, n)
    }

    fn string(&mut self, s: &str) -> u16 {
        let n = self.utf8(s);
        self.with_index(8, n)
    }

    fn integer(&mut self, v: i32) -> u16 {
        let mut e = vec![3];
        e.extend_from_slice(&v.to_be_bytes());
        self.add(e, 1)
    }

    fn name_and_type(&mut self, name: &str, desc: &str) -> u16 {
        let n = self.utf8(name);
        let d = self.utf8(desc);
        let mut e = vec![12];
        e.extend_from_slice(&n.to_be_bytes());
        e.extend_from_slice(&d.to_be_bytes());
        self.add(e, 1)
    }

    fn member(&mut self, tag: u8, owner: &str, name: &str, desc: &str) -> u16 {
        let c = self.class(owner);
        let nt = self.name_and_type(name, desc);
        let mut e = vec![tag];
        e.extend_from_slice(&c.to_be_bytes());
        e.extend_from_slice(&nt.to_be_bytes());
        self.add(e, 1)
    }

    fn count(&self) -> u16 {
        self.next.max(1)
    }
}

fn u2(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn attribute(pool: &mut Pool, name: &str, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    u2(&mut out, pool.utf8(name));
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn encode_element(pool: &mut Pool, out: &mut Vec<u8>, value: &Element) {
    match value {
        Element::Int(v) => {
            out.push(b'I');
            u2(out, pool.integer(*v));
        }
        Element::Enum(desc, name) => {
            out.push(b'e');
            u2(out, pool.utf8(desc));
            u2(out, pool.utf8(name));
        }
        Element::Array(values) => {
            out.push(b'[');
            u2(out, values.len() as u16);
            for v in values {
                encode_element(pool, out, v);
            }
        }
        Element::Nested(ann) => {
            out.push(b'@');
            encode_annotation(pool, out, ann);
        }
    }
}

fn encode_annotation(pool: &mut Pool, out: &mut Vec<u8>, ann: &Ann) {
    u2(out, pool.utf8(&ann.descriptor));
    u2(out, ann.elements.len() as u16);
    for (name, value) in &ann.elements {
        u2(out, pool.utf8(name));
        encode_element(pool, out, value);
    }
}

fn annotations_attribute(pool: &mut Pool, anns: &[Ann]) -> Vec<u8> {
    let mut body = Vec::new();
    u2(&mut body, anns.len() as u16);
    for ann in anns {
        encode_annotation(pool, &mut body, ann);
    }
    attribute(pool, "RuntimeVisibleAnnotations", &body)
}

fn encode_code(pool: &mut Pool, insns: &[Insn]) -> Vec<u8> {
    let mut code = Vec::new();
    for insn in insns {
        match insn {
            Insn::Raw(bytes) => code.extend_from_slice(bytes),
            Insn::Field(op, owner, name, desc) => {
                code.push(*op);
                u2(&mut code, pool.member(9, owner, name, desc));
            }
            Insn::Method(op, owner, name, desc) => {
                code.push(*op);
                u2(&mut code, pool.member(10, owner, name, desc));
            }
            Insn::Interface(owner, name, desc, count) => {
                code.push(0xb9);
                u2(&mut code, pool.member(11, owner, name, desc));
                code.push(*count);
                code.push(0);
            }
            Insn::InvokeDynamic => {
                // Operand index is never resolved for invokedynamic.
                code.extend_from_slice(&[0xba, 0, 1, 0, 0]);
            }
            Insn::Type(op, name) => {
                code.push(*op);
                u2(&mut code, pool.class(name));
            }
        }
    }
    code.push(RETURN);

    let mut body = Vec::new();
    u2(&mut body, 8); // max_stack
    u2(&mut body, 8); // max_locals
    body.extend_from_slice(&(code.len() as u32).to_be_bytes());
    body.extend_from_slice(&code);
    u2(&mut body, 0); // exception table
    u2(&mut body, 0); // attributes
    attribute(pool, "Code", &body)
}

/// Builds a class file.
pub struct ClassBuilder {
    pool: Pool,
    access: u16,
    this_class: u16,
    super_name: Option<String>,
    interfaces: Vec<u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}

impl ClassBuilder {
    /// Public class extending `java/lang/Object`.
    pub fn new(name: &str) -> Self {
        let mut pool = Pool::default();
        let this_class = pool.class(name);
        Self {
            pool,
            access: ACC_PUBLIC | ACC_SUPER,
            this_class,
            super_name: Some("java/lang/Object".into()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn super_class(mut self, name: Option<&str>) -> Self {
        self.super_name = name.map(String::from);
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        let idx = self.pool.class(name);
        self.interfaces.push(idx);
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        let idx = self.pool.utf8(signature);
        let mut body = Vec::new();
        u2(&mut body, idx);
        let attr = attribute(&mut self.pool, "Signature", &body);
        self.attributes.push(attr);
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        let idx = self.pool.utf8(name);
        let mut body = Vec::new();
        u2(&mut body, idx);
        let attr = attribute(&mut self.pool, "SourceFile", &body);
        self.attributes.push(attr);
        self
    }

    pub fn enclosing_method(mut self, owner: &str, method: Option<(&str, &str)>) -> Self {
        let class = self.pool.class(owner);
        let nt = match method {
            Some((name, desc)) => self.pool.name_and_type(name, desc),
            None => 0,
        };
        let mut body = Vec::new();
        u2(&mut body, class);
        u2(&mut body, nt);
        let attr = attribute(&mut self.pool, "EnclosingMethod", &body);
        self.attributes.push(attr);
        self
    }

    pub fn annotation(mut self, ann: Ann) -> Self {
        let attr = annotations_attribute(&mut self.pool, &[ann]);
        self.attributes.push(attr);
        self
    }

    pub fn custom_attribute(mut self, name: &str) -> Self {
        let attr = attribute(&mut self.pool, name, &[1, 2, 3]);
        self.attributes.push(attr);
        self
    }

    pub fn field(mut self, def: FieldSpec) -> Self {
        let pool = &mut self.pool;
        let mut out = Vec::new();
        u2(&mut out, def.access);
        u2(&mut out, pool.utf8(&def.name));
        u2(&mut out, pool.utf8(&def.descriptor));

        let mut attrs = Vec::new();
        if let Some(sig) = &def.signature {
            let idx = pool.utf8(sig);
            attrs.push(attribute(pool, "Signature", &idx.to_be_bytes()));
        }
        if let Some(constant) = &def.constant {
            let idx = match constant {
                Constant::Int(v) => pool.integer(*v),
                Constant::Str(s) => pool.string(s),
            };
            attrs.push(attribute(pool, "ConstantValue", &idx.to_be_bytes()));
        }
        if !def.annotations.is_empty() {
            attrs.push(annotations_attribute(pool, &def.annotations));
        }

        u2(&mut out, attrs.len() as u16);
        for a in attrs {
            out.extend_from_slice(&a);
        }
        self.fields.push(out);
        self
    }

    pub fn method(mut self, def: MethodSpec) -> Self {
        let pool = &mut self.pool;
        let mut out = Vec::new();
        u2(&mut out, def.access);
        u2(&mut out, pool.utf8(&def.name));
        u2(&mut out, pool.utf8(&def.descriptor));

        let mut attrs = Vec::new();
        if let Some(code) = &def.code {
            attrs.push(encode_code(pool, code));
        }
        if let Some(sig) = &def.signature {
            let idx = pool.utf8(sig);
            attrs.push(attribute(pool, "Signature", &idx.to_be_bytes()));
        }
        if !def.exceptions.is_empty() {
            let mut body = Vec::new();
            u2(&mut body, def.exceptions.len() as u16);
            for e in &def.exceptions {
                u2(&mut body, pool.class(e));
            }
            attrs.push(attribute(pool, "Exceptions", &body));
        }
        if !def.annotations.is_empty() {
            attrs.push(annotations_attribute(pool, &def.annotations));
        }
        if !def.parameter_annotations.is_empty() {
            let mut body = vec![def.parameter_annotations.len() as u8];
            for anns in &def.parameter_annotations {
                u2(&mut body, anns.len() as u16);
                for ann in anns {
                    encode_annotation(pool, &mut body, ann);
                }
            }
            attrs.push(attribute(pool, "RuntimeVisibleParameterAnnotations", &body));
        }
        if def.annotation_default {
            let mut body = Vec::new();
            encode_element(pool, &mut body, &Element::Int(0));
            attrs.push(attribute(pool, "AnnotationDefault", &body));
        }
        if let Some(name) = &def.custom_attribute {
            attrs.push(attribute(pool, name, &[0]));
        }

        u2(&mut out, attrs.len() as u16);
        for a in attrs {
            out.extend_from_slice(&a);
        }
        self.methods.push(out);
        self
    }

    /// `public <init>()` calling the superclass constructor.
    pub fn default_constructor(self) -> Self {
        let super_name = self
            .super_name
            .clone()
            .unwrap_or_else(|| "java/lang/Object".into());
        self.method(MethodSpec::new(ACC_PUBLIC, "<init>", "()V").code(vec![
            Insn::Raw(vec![ALOAD_0]),
            method_insn(INVOKESPECIAL, &super_name, "<init>", "()V"),
        ]))
    }

    pub fn build(mut self) -> Vec<u8> {
        let super_idx = match self.super_name.clone() {
            Some(name) => self.pool.class(&name),
            None => 0,
        };

        let mut out = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52];
        u2(&mut out, self.pool.count());
        out.extend_from_slice(&self.pool.bytes);
        u2(&mut out, self.access);
        u2(&mut out, self.this_class);
        u2(&mut out, super_idx);
        u2(&mut out, self.interfaces.len() as u16);
        for i in &self.interfaces {
            u2(&mut out, *i);
        }
        u2(&mut out, self.fields.len() as u16);
        for f in &self.fields {
            out.extend_from_slice(f);
        }
        u2(&mut out, self.methods.len() as u16);
        for m in &self.methods {
            out.extend_from_slice(m);
        }
        u2(&mut out, self.attributes.len() as u16);
        for a in &self.attributes {
            out.extend_from_slice(a);
        }
        out
    }
}

/// Zip `entries` into an in-memory jar, in the given order.
pub fn build_jar(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
