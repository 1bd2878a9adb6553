//! The builder contract (§4.6): the externally provided factory the
//! parser calls to materialise declarations and references.
//!
//! Declaration nodes are opaque to the parser (§3 "Ownership and
//! lifecycle") — it never inspects them, only asks the builder to create
//! one and then tells the builder what to attach to it. That shape maps
//! naturally onto opaque handle IDs into a builder-owned arena, the same
//! pattern `mesh-common::module_graph::ModuleGraph` uses for `ModuleId`
//! handles into its `Vec<ModuleInfo>`: the parser carries a `Copy` ID
//! around and the builder owns the real storage.
//!
//! Class and interface declarations share one handle type (`TypeId`)
//! because nearly everything the parser does to a type — doc comment,
//! modifiers, span, source file, member lists, token span — applies
//! identically to both; only `set_parent_class_reference` and
//! `set_user_defined` are meaningful for classes. Function, method, and
//! closure declarations share `CallableId` for the same reason.

use declscan_common::{LineSpan, Modifiers, Token, Value};

/// Factory + mutator operations the parser needs from a semantic-model
/// builder. All factory methods are idempotent by qualified/given name:
/// calling `build_class("A\\B")` twice must return the same `TypeId`, so
/// that a reference created while parsing file X can later be unified
/// with the declaration parsed from file Y.
pub trait Builder {
    type TypeId: Copy + Eq + std::fmt::Debug;
    type CallableId: Copy + Eq + std::fmt::Debug;
    type ParameterId: Copy + Eq + std::fmt::Debug;
    type PropertyId: Copy + Eq + std::fmt::Debug;
    type ConstantId: Copy + Eq + std::fmt::Debug;
    type PackageId: Copy + Eq + std::fmt::Debug;
    type ClassRefId: Copy + Eq + std::fmt::Debug;
    type InterfaceRefId: Copy + Eq + std::fmt::Debug;
    type ClassOrInterfaceRefId: Copy + Eq + std::fmt::Debug;

    // ── Factories ──────────────────────────────────────────────────────

    fn build_class(&mut self, fqn: &str) -> Self::TypeId;
    fn build_interface(&mut self, fqn: &str) -> Self::TypeId;
    fn build_class_reference(&mut self, fqn: &str) -> Self::ClassRefId;
    fn build_interface_reference(&mut self, fqn: &str) -> Self::InterfaceRefId;
    fn build_class_or_interface_reference(&mut self, fqn: &str) -> Self::ClassOrInterfaceRefId;
    fn build_function(&mut self, name: &str) -> Self::CallableId;
    fn build_method(&mut self, name: &str) -> Self::CallableId;
    fn build_closure(&mut self) -> Self::CallableId;
    fn build_property(&mut self, name: &str) -> Self::PropertyId;
    fn build_parameter(&mut self, name: &str) -> Self::ParameterId;
    fn build_type_constant(&mut self, name: &str) -> Self::ConstantId;
    fn build_package(&mut self, fqn: &str) -> Self::PackageId;

    // ── File ─────────────────────────────────────────────────────────

    /// Attach the file-global doc comment (§3 invariant 4, scenario S1).
    fn set_file_doc_comment(&mut self, source_file: &str, doc: Option<&str>);

    // ── Type (class or interface) ─────────────────────────────────────

    fn set_type_doc_comment(&mut self, id: Self::TypeId, doc: Option<&str>);
    fn set_type_modifiers(&mut self, id: Self::TypeId, modifiers: Modifiers);
    fn set_type_span(&mut self, id: Self::TypeId, span: LineSpan);
    fn set_type_source_file(&mut self, id: Self::TypeId, source_file: &str);
    fn set_type_tokens(&mut self, id: Self::TypeId, tokens: Vec<Token>);
    /// Class-only: the parent class, if `extends` was present.
    fn set_parent_class_reference(&mut self, id: Self::TypeId, parent: Self::ClassRefId);
    /// Applies to both a class's `implements` list and an interface's
    /// `extends` list — both are interface references (§4.5).
    fn add_interface_reference(&mut self, id: Self::TypeId, iface: Self::InterfaceRefId);
    fn add_method(&mut self, id: Self::TypeId, method: Self::CallableId);
    fn add_property(&mut self, id: Self::TypeId, property: Self::PropertyId);
    fn add_constant(&mut self, id: Self::TypeId, constant: Self::ConstantId);
    /// Class-only: set when the declaration originates in parsed source
    /// (always `true` from this parser — it has no notion of built-in
    /// types).
    fn set_user_defined(&mut self, id: Self::TypeId, user_defined: bool);

    // ── Callable (function, method, or closure) ───────────────────────

    fn set_callable_doc_comment(&mut self, id: Self::CallableId, doc: Option<&str>);
    /// Method-only; functions and closures never call this.
    fn set_callable_modifiers(&mut self, id: Self::CallableId, modifiers: Modifiers);
    fn set_callable_span(&mut self, id: Self::CallableId, span: LineSpan);
    fn set_callable_source_file(&mut self, id: Self::CallableId, source_file: &str);
    fn set_callable_tokens(&mut self, id: Self::CallableId, tokens: Vec<Token>);
    fn set_returns_by_reference(&mut self, id: Self::CallableId, by_reference: bool);
    fn add_parameter(&mut self, id: Self::CallableId, parameter: Self::ParameterId);
    /// From a body-level `new Qualified(...)` (§4.5).
    fn add_class_dependency(&mut self, id: Self::CallableId, class_ref: Self::ClassRefId);
    /// From a body-level `instanceof`, `catch (...)`, static access, or an
    /// inline `/* @var $x T */` comment (§4.5).
    fn add_class_or_interface_dependency(
        &mut self,
        id: Self::CallableId,
        reference: Self::ClassOrInterfaceRefId,
    );
    /// From `@throws` annotations (§4.7).
    fn add_exception_reference(&mut self, id: Self::CallableId, reference: Self::ClassOrInterfaceRefId);
    /// From a non-scalar `@return` annotation (§4.7).
    fn set_return_reference(&mut self, id: Self::CallableId, reference: Self::ClassOrInterfaceRefId);
    /// Closure-only: a `use (...)` bound variable.
    fn add_bound_variable(&mut self, id: Self::CallableId, name: &str, by_reference: bool);

    // ── Parameter ──────────────────────────────────────────────────────

    fn set_parameter_position(&mut self, id: Self::ParameterId, position: usize);
    fn set_parameter_by_reference(&mut self, id: Self::ParameterId, by_reference: bool);
    fn set_parameter_array_hint(&mut self, id: Self::ParameterId, array_hint: bool);
    fn set_parameter_reference(
        &mut self,
        id: Self::ParameterId,
        reference: Self::ClassOrInterfaceRefId,
    );
    fn set_parameter_default_value(&mut self, id: Self::ParameterId, value: Value);
    fn set_parameter_optional(&mut self, id: Self::ParameterId, optional: bool);

    // ── Property ───────────────────────────────────────────────────────

    fn set_property_doc_comment(&mut self, id: Self::PropertyId, doc: Option<&str>);
    fn set_property_modifiers(&mut self, id: Self::PropertyId, modifiers: Modifiers);
    fn set_property_span(&mut self, id: Self::PropertyId, span: LineSpan);
    fn set_property_source_file(&mut self, id: Self::PropertyId, source_file: &str);
    fn set_property_reference(
        &mut self,
        id: Self::PropertyId,
        reference: Self::ClassOrInterfaceRefId,
    );

    // ── Constant ───────────────────────────────────────────────────────

    fn set_constant_doc_comment(&mut self, id: Self::ConstantId, doc: Option<&str>);
    fn set_constant_span(&mut self, id: Self::ConstantId, span: LineSpan);
    fn set_constant_source_file(&mut self, id: Self::ConstantId, source_file: &str);

    // ── Package ────────────────────────────────────────────────────────

    fn add_function_to_package(&mut self, id: Self::PackageId, function: Self::CallableId);
    fn add_type_to_package(&mut self, id: Self::PackageId, ty: Self::TypeId);
}
