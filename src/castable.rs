//! The capability query protocol.
//!
//! An object answers "do you support interface X?" by switching over the
//! requested [`InterfaceId`] and returning a typed [`View`] of itself. There is no
//! class hierarchy involved: each concrete type decides which identifiers it
//! recognises.
//!
//! Two lookups exist:
//!
//! - [`Unknown::interface`] covers the interfaces the object implements. It backs
//! 	both query (new owning reference) and cast (borrowed alias).
//! - [`Castable::object`] covers concrete class identifiers. It is only reachable
//! 	through cast, since a concrete class is not an interface another component
//! 	may hold references through.

use std::any::Any ;
use thiserror::Error ;

use crate::{ Blob, InterfaceId, Status };



/// A typed view into an object, produced by a capability lookup.
#[derive( Clone, Copy )]
pub enum View<'a> {
	/// The object's identity.
	Unknown( &'a ( dyn Unknown + 'static )),
	/// The object as something that can be cast.
	Castable( &'a ( dyn Castable + 'static )),
	/// The object as a byte buffer.
	Blob( &'a ( dyn Blob + 'static )),
	/// The concrete object itself, recovered with [`Any::downcast_ref`].
	Object( &'a ( dyn Any + 'static )),
}

impl std::fmt::Debug for View<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Unknown( _ ) => write!( f, "View::Unknown" ),
			Self::Castable( _ ) => write!( f, "View::Castable" ),
			Self::Blob( blob ) => write!( f, "View::Blob( {} bytes )", blob.buffer_size() ),
			Self::Object( _ ) => write!( f, "View::Object" ),
		}
	}
}

/// The root of every object that can cross a component boundary.
///
/// Implementors list the interfaces they support in [`interface`](Self::interface),
/// usually as a `match` over the identifier. Returning `None` is the normal answer
/// for anything not recognised and must never panic.
///
/// Objects are shared between threads through [`Ref`]( crate::Ref ), hence the
/// `Send + Sync` bound. Nothing beyond the reference count is synchronised, so
/// objects should be immutable once constructed.
pub trait Unknown: Send + Sync + 'static {
	/// Looks up one of the interfaces this object implements.
	fn interface( &self, id: &InterfaceId ) -> Option<View<'_>> ;
}

/// An object that can be re-viewed as another interface or as its concrete type
/// without taking a new reference.
pub trait Castable: Unknown {

	/// Looks up a concrete class identifier.
	///
	/// The default recognises none.
	fn object( &self, id: &InterfaceId ) -> Option<&( dyn Any + 'static )> {
		let _ = id ;
		None
	}

	/// Looks `id` up among the interfaces, then among the concrete classes.
	fn cast_as( &self, id: &InterfaceId ) -> Option<View<'_>> {
		self.interface( id ).or_else(|| self.object( id ).map( View::Object ))
	}

}

/// A type that can be requested through a capability lookup.
///
/// Implemented by interface trait objects (`dyn Unknown`, `dyn Castable`,
/// `dyn Blob`) and by concrete classes that want to be reachable through cast.
pub trait Interface: 'static {

	/// The identifier naming this capability.
	const ID: InterfaceId ;

	/// Recovers the typed reference from a view returned for [`Self::ID`].
	fn from_view<'a>( view: View<'a> ) -> Option<&'a Self> ;

}

impl Interface for dyn Unknown {
	const ID: InterfaceId = InterfaceId::new(
		0x0000_0000, 0x0000, 0x0000, [ 0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46 ],
	);
	fn from_view<'a>( view: View<'a> ) -> Option<&'a Self> { match view {
		View::Unknown( unknown ) => Some( unknown ),
		_ => None,
	}}
}

impl Interface for dyn Castable {
	const ID: InterfaceId = InterfaceId::new(
		0x87ed_e0e1, 0x4852, 0x44b0, [ 0x8b, 0xf2, 0xcb, 0x31, 0x87, 0x4d, 0xe2, 0x39 ],
	);
	fn from_view<'a>( view: View<'a> ) -> Option<&'a Self> { match view {
		View::Castable( castable ) => Some( castable ),
		_ => None,
	}}
}

/// Looks `I` up through `object`'s interface table.
pub(crate) fn lookup_interface<'a, O, I>( object: &'a O ) -> Result<&'a I, QueryError>
where
	O: ?Sized + Unknown,
	I: ?Sized + Interface,
{
	object.interface( &I::ID ).and_then( I::from_view ).ok_or_else(|| {
		tracing::trace!( interface = %I::ID, "interface not supported" );
		QueryError::NoInterface( I::ID )
	})
}

/// Looks `I` up through `object`'s interface and class tables.
pub(crate) fn lookup_cast<'a, O, I>( object: &'a O ) -> Option<&'a I>
where
	O: ?Sized + Castable,
	I: ?Sized + Interface,
{
	object.cast_as( &I::ID ).and_then( I::from_view )
}

/// Errors returned by a capability query.
///
/// An unsupported interface is an expected outcome used for discovery, not a fault.
#[derive( Debug, Error, Clone, Copy, PartialEq, Eq )]
pub enum QueryError {
	/// The object does not support the requested interface.
	#[error( "No Interface: {0}" )] NoInterface( InterfaceId ),
}

impl From<QueryError> for Status {
	fn from( error: QueryError ) -> Self { match error {
		QueryError::NoInterface( _ ) => Status::NO_INTERFACE,
	}}
}
