//! The contract with an external compiler.
//!
//! The compiler itself is a separate component reached only through the
//! [`Compiler`] trait. Everything that crosses that boundary is a blob: source
//! text goes in as a [`BlobRef`] (owned or borrowed), generated code and
//! diagnostics come back as [`Ref<dyn Blob>`]( crate::Ref ).
//!
//! ```
//! use castable::{ BlobView, OwnedBlob };
//! use castable::session::{ compile, CompileError, CompileOutput, CompileRequest, Compiler, Target };
//!
//! struct Echo ;
//! impl Compiler for Echo {
//! 	fn compile( &self, request: &CompileRequest<'_> ) -> Result<CompileOutput, CompileError> {
//! 		let code = request.units().iter()
//! 			.flat_map(| unit | unit.source().as_bytes().iter().copied() )
//! 			.collect::<Vec<_>>();
//! 		Ok( CompileOutput::new( OwnedBlob::create( code ), None ))
//! 	}
//! }
//!
//! let text = String::from( "int f() { return 42; }" );
//! let source = BlobView::borrow( text.as_bytes() );
//! let request = CompileRequest::new( Target::HostCallable )
//! 	.with_whole_program( true )
//! 	.with_source( "test.slang", &source );
//!
//! let output = compile( &Echo, &request ).unwrap();
//! assert_eq!( output.code().as_str(), Ok( "int f() { return 42; }" ));
//! ```

use thiserror::Error ;

use crate::{ Blob, BlobRef, Ref, Status };



/// What the compiler should generate.
#[derive( Copy, Clone, Debug, Eq, PartialEq, Hash )]
pub enum Target {
	/// Code that the host process can call directly.
	HostCallable,
	/// A shared library.
	SharedLibrary,
	/// SPIR-V binary.
	Spirv,
	/// DXIL binary.
	Dxil,
	/// C++ source.
	Cpp,
}

impl std::fmt::Display for Target {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::HostCallable => write!( f, "host-callable" ),
			Self::SharedLibrary => write!( f, "shared-library" ),
			Self::Spirv => write!( f, "spirv" ),
			Self::Dxil => write!( f, "dxil" ),
			Self::Cpp => write!( f, "cpp" ),
		}
	}
}

/// One translation unit: source text and the label it is reported under.
#[derive( Debug, Clone )]
pub struct SourceUnit<'a> {
	label: String,
	source: BlobRef<'a>,
}

impl<'a> SourceUnit<'a> {
	/// File-name-like label, used only in diagnostics.
	#[inline] pub fn label( &self ) -> &str { &self.label }
	/// The source text.
	#[inline] pub fn source( &self ) -> &BlobRef<'a> { &self.source }
}

/// A request to compile one or more translation units for a [`Target`].
#[derive( Debug, Clone )]
#[must_use = "pass the request to compile()"]
pub struct CompileRequest<'a> {
	target: Target,
	whole_program: bool,
	units: Vec<SourceUnit<'a>>,
}

impl<'a> CompileRequest<'a> {

	/// Creates an empty request for `target`.
	pub fn new( target: Target ) -> Self {
		Self { target, whole_program: false, units: Vec::with_capacity( 1 ) }
	}

	/// Asks for every entry point to be generated into one program.
	pub fn with_whole_program( mut self, enabled: bool ) -> Self {
		self.whole_program = enabled ;
		self
	}

	/// Adds a translation unit.
	///
	/// The source may be a borrowed view: the request then borrows the lender's
	/// memory and can not outlive it.
	pub fn with_source( mut self, label: impl Into<String>, source: impl Into<BlobRef<'a>> ) -> Self {
		self.units.push( SourceUnit { label: label.into(), source: source.into() });
		self
	}

	#[inline] pub fn target( &self ) -> Target { self.target }
	#[inline] pub fn whole_program( &self ) -> bool { self.whole_program }
	#[inline] pub fn units( &self ) -> &[SourceUnit<'a>] { &self.units }

}

/// What a successful compilation returns.
#[derive( Debug, Clone )]
pub struct CompileOutput {
	code: Ref<dyn Blob>,
	diagnostics: Option<Ref<dyn Blob>>,
}

impl CompileOutput {

	/// Bundles generated code with optional, non-fatal diagnostics.
	///
	/// Empty diagnostics are treated as none.
	pub fn new( code: Ref<dyn Blob>, diagnostics: Option<Ref<dyn Blob>> ) -> Self {
		Self { code, diagnostics: diagnostics.filter(| blob | blob.buffer_size() != 0 ) }
	}

	/// The generated code, as opaque bytes.
	#[inline] pub fn code( &self ) -> &Ref<dyn Blob> { &self.code }
	/// Human-readable warnings, if any were produced.
	#[inline] pub fn diagnostics( &self ) -> Option<&Ref<dyn Blob>> { self.diagnostics.as_ref() }
	/// Takes the generated code.
	#[inline] pub fn into_code( self ) -> Ref<dyn Blob> { self.code }

}

/// Errors returned by a compilation.
#[derive( Debug, Error )]
pub enum CompileError {
	/// The request has no translation units.
	#[error( "No Sources" )] NoSources,
	/// The compiler can not generate code for this target.
	#[error( "Unsupported Target: {0}" )] UnsupportedTarget( Target ),
	/// The compiler rejected the source; details are in the diagnostics.
	#[error( "Compilation Failed" )] Failed { diagnostics: Option<Ref<dyn Blob>> },
}

impl CompileError {

	/// Diagnostics text attached to a failure, if any.
	pub fn diagnostics( &self ) -> Option<&Ref<dyn Blob>> {
		match self {
			Self::Failed { diagnostics } => diagnostics.as_ref(),
			Self::NoSources | Self::UnsupportedTarget( _ ) => None,
		}
	}

}

impl From<&CompileError> for Status {
	fn from( error: &CompileError ) -> Self { match error {
		CompileError::NoSources => Status::INVALID_ARG,
		CompileError::UnsupportedTarget( _ ) => Status::NOT_IMPLEMENTED,
		CompileError::Failed { .. } => Status::FAIL,
	}}
}

/// An external compiler.
pub trait Compiler {

	/// Compiles every unit of `request`.
	///
	/// # Errors
	/// Implementations return [`CompileError::Failed`] with diagnostics when the
	/// source is rejected.
	fn compile( &self, request: &CompileRequest<'_> ) -> Result<CompileOutput, CompileError> ;

}

/// Runs `compiler` on `request`.
///
/// Requests without sources are rejected before reaching the compiler.
/// Diagnostics are logged as warnings.
///
/// # Errors
/// Returns [`CompileError::NoSources`] for an empty request, otherwise whatever
/// the compiler returned.
pub fn compile<C: Compiler + ?Sized>(
	compiler: &C,
	request: &CompileRequest<'_>,
) -> Result<CompileOutput, CompileError> {

	if request.units().is_empty() { return Err( CompileError::NoSources ) }

	tracing::debug!(
		codegen_target = %request.target(),
		units = request.units().len(),
		whole_program = request.whole_program(),
		"compiling"
	);

	let output = compiler.compile( request ).inspect_err(| err | match err.diagnostics() {
		Some( diagnostics ) => tracing::warn!( %err, diagnostics = %String::from_utf8_lossy( diagnostics.as_bytes() ), "compilation failed" ),
		None => tracing::warn!( %err, "compilation failed" ),
	})?;

	if let Some( diagnostics ) = output.diagnostics() {
		tracing::warn!( diagnostics = %String::from_utf8_lossy( diagnostics.as_bytes() ), "compiler produced diagnostics" );
	}

	Ok( output )

}
