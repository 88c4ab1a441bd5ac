use std::ops::Deref ;

use crate::{ Castable, Interface, QueryError, Ref, Unknown };
use crate::castable::{ lookup_cast, lookup_interface };



/// The count reported by reference operations on borrowed objects.
///
/// Borrowed objects do not take part in reference counting; their
/// add-reference and release operations do nothing and return this value.
pub const INERT_REF_COUNT: u32 = 1 ;

/// Either an owning reference or a plain borrow of an object viewed through `I`.
///
/// A callee that accepts a `Handle` can treat both variants the same way:
/// query, cast, add a reference, release. For [`Handle::Borrowed`] those
/// reference operations are inert and the borrow checker guarantees the lender
/// outlives the callee's use.
pub enum Handle<'a, I: ?Sized> {
	/// Holds one reference on a counted object.
	Counted( Ref<I> ),
	/// Borrows an object that is not counted, or whose count is not touched.
	Borrowed( &'a I ),
}

impl<'a, I: ?Sized> Handle<'a, I> {

	/// Returns `true` for [`Handle::Counted`].
	#[inline] pub fn is_counted( this: &Self ) -> bool { matches!( this, Self::Counted( _ ))}

	/// Number of references on a counted object, [`INERT_REF_COUNT`] otherwise.
	pub fn ref_count( this: &Self ) -> u32 { match this {
		Self::Counted( object ) => Ref::ref_count( object ),
		Self::Borrowed( _ ) => INERT_REF_COUNT,
	}}

	/// Adds a reference on a counted object; copies the borrow otherwise.
	pub fn add_reference( this: &Self ) -> Self { match this {
		Self::Counted( object ) => Self::Counted( Ref::add_reference( object )),
		Self::Borrowed( object ) => Self::Borrowed( *object ),
	}}

	/// Gives up this handle. Returns the remaining count of a counted object,
	/// [`INERT_REF_COUNT`] for a borrow.
	pub fn release( this: Self ) -> u32 { match this {
		Self::Counted( object ) => Ref::release( object ),
		Self::Borrowed( _ ) => INERT_REF_COUNT,
	}}

}

impl<'a, I: ?Sized + Unknown> Handle<'a, I> {

	/// Requests interface `J`.
	///
	/// A counted handle yields a new counted handle, incrementing the count by one;
	/// a borrow yields a borrow with the same lifetime.
	///
	/// # Errors
	/// Returns [`QueryError::NoInterface`] if the object does not implement `J`.
	pub fn query_interface<J: ?Sized + Interface>( this: &Self ) -> Result<Handle<'a, J>, QueryError> {
		match this {
			Self::Counted( object ) => Ref::query_interface( object ).map( Handle::Counted ),
			Self::Borrowed( object ) => lookup_interface::<I, J>( *object ).map( Handle::Borrowed ),
		}
	}

}

impl<I: ?Sized + Castable> Handle<'_, I> {

	/// Views the object as `J` without adding a reference.
	pub fn cast_as<J: ?Sized + Interface>( this: &Self ) -> Option<&J> {
		lookup_cast::<I, J>( &**this )
	}

}

impl<I: ?Sized> Deref for Handle<'_, I> {
	type Target = I ;
	fn deref( &self ) -> &I { match self {
		Self::Counted( object ) => &**object,
		Self::Borrowed( object ) => *object,
	}}
}

impl<I: ?Sized> Clone for Handle<'_, I> {
	fn clone( &self ) -> Self { Self::add_reference( self ) }
}

impl<I: ?Sized> From<Ref<I>> for Handle<'_, I> {
	fn from( object: Ref<I> ) -> Self { Self::Counted( object )}
}

impl<I: ?Sized> std::fmt::Debug for Handle<'_, I> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Counted( object ) => f.debug_tuple( "Counted" ).field( object ).finish(),
			Self::Borrowed( _ ) => f.debug_tuple( "Borrowed" ).finish_non_exhaustive(),
		}
	}
}
