//! A reference [`Builder`] implementation for exercising the parser
//! without a real semantic-model crate.
//!
//! Mirrors the style of `mesh-typeck`'s test registries
//! (`StructDefInfo`, `SumTypeDefInfo`, ...): plain structs pushed into
//! `Vec`s, asserted on directly by field rather than via tree snapshots.
//! There is no real interning of forward references here beyond
//! name-keyed idempotence (§4.6) — good enough for single-file parser
//! tests, which is all this crate's test suite needs.

use rustc_hash::FxHashMap;

use declscan_common::{LineSpan, Modifiers, Token, Value};

use crate::builder::Builder;

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

handle!(TypeId);
handle!(CallableId);
handle!(ParameterId);
handle!(PropertyId);
handle!(ConstantId);
handle!(PackageId);
handle!(ClassRefId);
handle!(InterfaceRefId);
handle!(ClassOrInterfaceRefId);

#[derive(Debug, Clone, Default)]
pub struct TypeRecord {
    pub fqn: String,
    pub is_interface: bool,
    pub doc: Option<String>,
    pub modifiers: Modifiers,
    pub span: Option<LineSpan>,
    pub source_file: String,
    pub tokens: Vec<Token>,
    pub parent: Option<ClassRefId>,
    pub interfaces: Vec<InterfaceRefId>,
    pub methods: Vec<CallableId>,
    pub properties: Vec<PropertyId>,
    pub constants: Vec<ConstantId>,
    pub user_defined: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CallableRecord {
    pub name: Option<String>,
    pub doc: Option<String>,
    pub modifiers: Modifiers,
    pub span: Option<LineSpan>,
    pub source_file: String,
    pub tokens: Vec<Token>,
    pub returns_by_reference: bool,
    pub parameters: Vec<ParameterId>,
    pub class_dependencies: Vec<ClassRefId>,
    pub class_or_interface_dependencies: Vec<ClassOrInterfaceRefId>,
    pub exception_references: Vec<ClassOrInterfaceRefId>,
    pub return_reference: Option<ClassOrInterfaceRefId>,
    pub bound_variables: Vec<(String, bool)>,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterRecord {
    pub name: String,
    pub position: usize,
    pub by_reference: bool,
    pub array_hint: bool,
    pub reference: Option<ClassOrInterfaceRefId>,
    pub default_value: Option<Value>,
    pub optional: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyRecord {
    pub name: String,
    pub doc: Option<String>,
    pub modifiers: Modifiers,
    pub span: Option<LineSpan>,
    pub source_file: String,
    pub reference: Option<ClassOrInterfaceRefId>,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantRecord {
    pub name: String,
    pub doc: Option<String>,
    pub span: Option<LineSpan>,
    pub source_file: String,
}

#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub fqn: String,
    pub functions: Vec<CallableId>,
    pub types: Vec<TypeId>,
}

/// Records every builder call it receives. Factory methods are
/// name-idempotent: calling `build_class("A\\B")` twice returns the same
/// [`TypeId`].
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    pub types: Vec<TypeRecord>,
    pub callables: Vec<CallableRecord>,
    pub parameters: Vec<ParameterRecord>,
    pub properties: Vec<PropertyRecord>,
    pub constants: Vec<ConstantRecord>,
    pub packages: Vec<PackageRecord>,
    pub class_refs: Vec<String>,
    pub interface_refs: Vec<String>,
    pub class_or_interface_refs: Vec<String>,
    pub file_doc_comments: FxHashMap<String, String>,

    type_index: FxHashMap<String, u32>,
    callable_index: FxHashMap<String, u32>,
    package_index: FxHashMap<String, u32>,
    class_ref_index: FxHashMap<String, u32>,
    interface_ref_index: FxHashMap<String, u32>,
    class_or_interface_ref_index: FxHashMap<String, u32>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern_type(&mut self, fqn: &str, is_interface: bool) -> TypeId {
        if let Some(&idx) = self.type_index.get(fqn) {
            return TypeId(idx);
        }
        let idx = self.types.len() as u32;
        self.types.push(TypeRecord {
            fqn: fqn.to_string(),
            is_interface,
            ..Default::default()
        });
        self.type_index.insert(fqn.to_string(), idx);
        TypeId(idx)
    }

    fn intern_callable(&mut self, name: &str) -> CallableId {
        if let Some(&idx) = self.callable_index.get(name) {
            return CallableId(idx);
        }
        let idx = self.callables.len() as u32;
        self.callables.push(CallableRecord {
            name: Some(name.to_string()),
            ..Default::default()
        });
        self.callable_index.insert(name.to_string(), idx);
        CallableId(idx)
    }

    fn intern_ref(
        index: &mut FxHashMap<String, u32>,
        storage: &mut Vec<String>,
        fqn: &str,
    ) -> u32 {
        if let Some(&idx) = index.get(fqn) {
            return idx;
        }
        let idx = storage.len() as u32;
        storage.push(fqn.to_string());
        index.insert(fqn.to_string(), idx);
        idx
    }
}

impl Builder for RecordingBuilder {
    type TypeId = TypeId;
    type CallableId = CallableId;
    type ParameterId = ParameterId;
    type PropertyId = PropertyId;
    type ConstantId = ConstantId;
    type PackageId = PackageId;
    type ClassRefId = ClassRefId;
    type InterfaceRefId = InterfaceRefId;
    type ClassOrInterfaceRefId = ClassOrInterfaceRefId;

    fn build_class(&mut self, fqn: &str) -> Self::TypeId {
        self.intern_type(fqn, false)
    }

    fn build_interface(&mut self, fqn: &str) -> Self::TypeId {
        self.intern_type(fqn, true)
    }

    fn build_class_reference(&mut self, fqn: &str) -> Self::ClassRefId {
        ClassRefId(Self::intern_ref(
            &mut self.class_ref_index,
            &mut self.class_refs,
            fqn,
        ))
    }

    fn build_interface_reference(&mut self, fqn: &str) -> Self::InterfaceRefId {
        InterfaceRefId(Self::intern_ref(
            &mut self.interface_ref_index,
            &mut self.interface_refs,
            fqn,
        ))
    }

    fn build_class_or_interface_reference(&mut self, fqn: &str) -> Self::ClassOrInterfaceRefId {
        ClassOrInterfaceRefId(Self::intern_ref(
            &mut self.class_or_interface_ref_index,
            &mut self.class_or_interface_refs,
            fqn,
        ))
    }

    fn build_function(&mut self, name: &str) -> Self::CallableId {
        self.intern_callable(name)
    }

    fn build_method(&mut self, name: &str) -> Self::CallableId {
        self.intern_callable(name)
    }

    fn build_closure(&mut self) -> Self::CallableId {
        let idx = self.callables.len() as u32;
        self.callables.push(CallableRecord::default());
        CallableId(idx)
    }

    fn build_property(&mut self, name: &str) -> Self::PropertyId {
        let idx = self.properties.len() as u32;
        self.properties.push(PropertyRecord {
            name: name.to_string(),
            ..Default::default()
        });
        PropertyId(idx)
    }

    fn build_parameter(&mut self, name: &str) -> Self::ParameterId {
        let idx = self.parameters.len() as u32;
        self.parameters.push(ParameterRecord {
            name: name.to_string(),
            ..Default::default()
        });
        ParameterId(idx)
    }

    fn build_type_constant(&mut self, name: &str) -> Self::ConstantId {
        let idx = self.constants.len() as u32;
        self.constants.push(ConstantRecord {
            name: name.to_string(),
            ..Default::default()
        });
        ConstantId(idx)
    }

    fn build_package(&mut self, fqn: &str) -> Self::PackageId {
        if let Some(&idx) = self.package_index.get(fqn) {
            return PackageId(idx);
        }
        let idx = self.packages.len() as u32;
        self.packages.push(PackageRecord {
            fqn: fqn.to_string(),
            ..Default::default()
        });
        self.package_index.insert(fqn.to_string(), idx);
        PackageId(idx)
    }

    fn set_file_doc_comment(&mut self, source_file: &str, doc: Option<&str>) {
        if let Some(doc) = doc {
            self.file_doc_comments
                .insert(source_file.to_string(), doc.to_string());
        }
    }

    fn set_type_doc_comment(&mut self, id: Self::TypeId, doc: Option<&str>) {
        self.types[id.0 as usize].doc = doc.map(str::to_string);
    }

    fn set_type_modifiers(&mut self, id: Self::TypeId, modifiers: Modifiers) {
        self.types[id.0 as usize].modifiers = modifiers;
    }

    fn set_type_span(&mut self, id: Self::TypeId, span: LineSpan) {
        self.types[id.0 as usize].span = Some(span);
    }

    fn set_type_source_file(&mut self, id: Self::TypeId, source_file: &str) {
        self.types[id.0 as usize].source_file = source_file.to_string();
    }

    fn set_type_tokens(&mut self, id: Self::TypeId, tokens: Vec<Token>) {
        self.types[id.0 as usize].tokens = tokens;
    }

    fn set_parent_class_reference(&mut self, id: Self::TypeId, parent: Self::ClassRefId) {
        self.types[id.0 as usize].parent = Some(parent);
    }

    fn add_interface_reference(&mut self, id: Self::TypeId, iface: Self::InterfaceRefId) {
        self.types[id.0 as usize].interfaces.push(iface);
    }

    fn add_method(&mut self, id: Self::TypeId, method: Self::CallableId) {
        self.types[id.0 as usize].methods.push(method);
    }

    fn add_property(&mut self, id: Self::TypeId, property: Self::PropertyId) {
        self.types[id.0 as usize].properties.push(property);
    }

    fn add_constant(&mut self, id: Self::TypeId, constant: Self::ConstantId) {
        self.types[id.0 as usize].constants.push(constant);
    }

    fn set_user_defined(&mut self, id: Self::TypeId, user_defined: bool) {
        self.types[id.0 as usize].user_defined = user_defined;
    }

    fn set_callable_doc_comment(&mut self, id: Self::CallableId, doc: Option<&str>) {
        self.callables[id.0 as usize].doc = doc.map(str::to_string);
    }

    fn set_callable_modifiers(&mut self, id: Self::CallableId, modifiers: Modifiers) {
        self.callables[id.0 as usize].modifiers = modifiers;
    }

    fn set_callable_span(&mut self, id: Self::CallableId, span: LineSpan) {
        self.callables[id.0 as usize].span = Some(span);
    }

    fn set_callable_source_file(&mut self, id: Self::CallableId, source_file: &str) {
        self.callables[id.0 as usize].source_file = source_file.to_string();
    }

    fn set_callable_tokens(&mut self, id: Self::CallableId, tokens: Vec<Token>) {
        self.callables[id.0 as usize].tokens = tokens;
    }

    fn set_returns_by_reference(&mut self, id: Self::CallableId, by_reference: bool) {
        self.callables[id.0 as usize].returns_by_reference = by_reference;
    }

    fn add_parameter(&mut self, id: Self::CallableId, parameter: Self::ParameterId) {
        self.callables[id.0 as usize].parameters.push(parameter);
    }

    fn add_class_dependency(&mut self, id: Self::CallableId, class_ref: Self::ClassRefId) {
        self.callables[id.0 as usize]
            .class_dependencies
            .push(class_ref);
    }

    fn add_class_or_interface_dependency(
        &mut self,
        id: Self::CallableId,
        reference: Self::ClassOrInterfaceRefId,
    ) {
        self.callables[id.0 as usize]
            .class_or_interface_dependencies
            .push(reference);
    }

    fn add_exception_reference(
        &mut self,
        id: Self::CallableId,
        reference: Self::ClassOrInterfaceRefId,
    ) {
        self.callables[id.0 as usize]
            .exception_references
            .push(reference);
    }

    fn set_return_reference(&mut self, id: Self::CallableId, reference: Self::ClassOrInterfaceRefId) {
        self.callables[id.0 as usize].return_reference = Some(reference);
    }

    fn add_bound_variable(&mut self, id: Self::CallableId, name: &str, by_reference: bool) {
        self.callables[id.0 as usize]
            .bound_variables
            .push((name.to_string(), by_reference));
    }

    fn set_parameter_position(&mut self, id: Self::ParameterId, position: usize) {
        self.parameters[id.0 as usize].position = position;
    }

    fn set_parameter_by_reference(&mut self, id: Self::ParameterId, by_reference: bool) {
        self.parameters[id.0 as usize].by_reference = by_reference;
    }

    fn set_parameter_array_hint(&mut self, id: Self::ParameterId, array_hint: bool) {
        self.parameters[id.0 as usize].array_hint = array_hint;
    }

    fn set_parameter_reference(
        &mut self,
        id: Self::ParameterId,
        reference: Self::ClassOrInterfaceRefId,
    ) {
        self.parameters[id.0 as usize].reference = Some(reference);
    }

    fn set_parameter_default_value(&mut self, id: Self::ParameterId, value: Value) {
        self.parameters[id.0 as usize].default_value = Some(value);
    }

    fn set_parameter_optional(&mut self, id: Self::ParameterId, optional: bool) {
        self.parameters[id.0 as usize].optional = optional;
    }

    fn set_property_doc_comment(&mut self, id: Self::PropertyId, doc: Option<&str>) {
        self.properties[id.0 as usize].doc = doc.map(str::to_string);
    }

    fn set_property_modifiers(&mut self, id: Self::PropertyId, modifiers: Modifiers) {
        self.properties[id.0 as usize].modifiers = modifiers;
    }

    fn set_property_span(&mut self, id: Self::PropertyId, span: LineSpan) {
        self.properties[id.0 as usize].span = Some(span);
    }

    fn set_property_source_file(&mut self, id: Self::PropertyId, source_file: &str) {
        self.properties[id.0 as usize].source_file = source_file.to_string();
    }

    fn set_property_reference(
        &mut self,
        id: Self::PropertyId,
        reference: Self::ClassOrInterfaceRefId,
    ) {
        self.properties[id.0 as usize].reference = Some(reference);
    }

    fn set_constant_doc_comment(&mut self, id: Self::ConstantId, doc: Option<&str>) {
        self.constants[id.0 as usize].doc = doc.map(str::to_string);
    }

    fn set_constant_span(&mut self, id: Self::ConstantId, span: LineSpan) {
        self.constants[id.0 as usize].span = Some(span);
    }

    fn set_constant_source_file(&mut self, id: Self::ConstantId, source_file: &str) {
        self.constants[id.0 as usize].source_file = source_file.to_string();
    }

    fn add_function_to_package(&mut self, id: Self::PackageId, function: Self::CallableId) {
        self.packages[id.0 as usize].functions.push(function);
    }

    fn add_type_to_package(&mut self, id: Self::PackageId, ty: Self::TypeId) {
        self.packages[id.0 as usize].types.push(ty);
    }
}
