//! Reference-counted objects and byte blobs that can cross a component boundary.
//!
//! Two independently built components (say, a host application and a compiler
//! library) exchange objects without sharing a type system. They agree only on
//! a small protocol: every capability is named by a 128-bit [`InterfaceId`], an
//! object can be asked whether it supports one, and object lifetime is governed
//! by a shared reference count.
//!
//! # Core Concepts
//!
//! - [`InterfaceId`]: A 128-bit identifier naming a capability. Attached to a
//! 	capability type at compile time through [`Interface::ID`].
//!
//! - [`Unknown`]: The root of every object. Answers capability lookups by returning a
//! 	typed [`View`] of itself for the identifiers it recognises.
//!
//! - [`Castable`]: An object that can also be re-viewed without taking a reference,
//! 	including as its concrete class.
//!
//! - [`Ref`]: An owning handle on a counted object. Cloning adds a reference,
//! 	dropping gives it up, and the object is destroyed when the last one goes.
//!
//! - [`Blob`]: A read-only byte range. [`OwnedBlob`] owns its bytes and lives behind
//! 	a [`Ref`]; [`BlobView`] borrows someone else's and its reference operations are
//! 	inert. [`BlobRef`] accepts either.
//!
//! - [`session`]: The contract with a compiler that consumes source blobs and
//! 	produces code blobs.
//!
//! - [`abi`]: The same protocol as `extern "C"` functions over opaque pointers.
//!
//! # Example
//!
//! ```
//! use castable::{ Blob, Castable, OwnedBlob, Ref, Unknown };
//!
//! // The creator receives the first reference.
//! let blob = OwnedBlob::create( "hello" );
//! assert_eq!( Ref::ref_count( &blob ), 1 );
//!
//! // Querying hands out a new reference on another view of the same object.
//! let castable = Ref::query_interface::<dyn Castable>( &blob ).unwrap();
//! assert_eq!( Ref::ref_count( &blob ), 2 );
//!
//! // Casting only borrows.
//! let concrete = Ref::cast_as::<OwnedBlob>( &castable ).unwrap();
//! assert_eq!( concrete.as_bytes(), b"hello" );
//! assert_eq!( Ref::ref_count( &blob ), 2 );
//!
//! // Unsupported capabilities are reported, not faults.
//! struct Opaque ;
//! impl Unknown for Opaque {
//! 	fn interface( &self, _: &castable::InterfaceId ) -> Option<castable::View<'_>> { None }
//! }
//! impl Castable for Opaque {}
//! let opaque = Ref::new( Opaque );
//! assert!( Ref::query_interface::<dyn Blob>( &opaque ).is_err() );
//! assert_eq!( Ref::ref_count( &opaque ), 1 );
//!
//! assert_eq!( Ref::release( castable ), 1 );
//! assert_eq!( Ref::release( blob ), 0 );
//! ```
//!
//! # Borrowed Blobs
//!
//! Data the caller already owns, such as an in-memory source file, can be handed
//! to a consumer without copying. The borrow checker keeps the view from
//! outliving the data.
//!
//! ```
//! use castable::{ Blob, BlobRef, BlobView, Handle };
//!
//! fn checksum( blob: BlobRef<'_> ) -> u32 {
//! 	let sum = blob.as_bytes().iter().map(| byte | u32::from( *byte )).sum();
//! 	Handle::release( blob );
//! 	sum
//! }
//!
//! let source = vec![ 1, 2, 3 ];
//! let view = BlobView::borrow( &source );
//! assert_eq!( checksum( BlobRef::from( &view )), 6 );
//! assert_eq!( view.buffer_size(), 3 );
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Failed
//! lookups and destruction are reported at `trace`, compiler diagnostics at
//! `warn`, and null pointers passed to the C entry points at `error`.

mod interface_id ;
mod ref_count ;
mod status ;
mod castable ;
mod object ;
mod handle ;
mod blob ;
pub mod session ;
pub mod abi ;

pub use interface_id::{ InterfaceId, InterfaceError, InterfaceRegistry, all_distinct };
pub use ref_count::RefCount ;
pub use status::Status ;
pub use castable::{ View, Unknown, Castable, Interface, QueryError };
pub use object::{ ObjectHeader, Ref };
pub use handle::{ Handle, INERT_REF_COUNT };
pub use blob::{ Blob, OwnedBlob, BlobView, Borrowed, BlobRef };

const _: () = assert!( all_distinct( &[
	<dyn Unknown as Interface>::ID,
	<dyn Castable as Interface>::ID,
	<dyn Blob as Interface>::ID,
	<OwnedBlob as Interface>::ID,
]));
