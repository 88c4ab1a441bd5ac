//! Reference-counted object storage and the owning [`Ref`] handle.
//!
//! A counted object is allocated as an [`ObjectHeader`] followed by the value.
//! The header carries the atomic count and a table of per-type hooks. When the
//! last reference goes away the header's `destroy` hook runs, so the object is
//! freed by the code (and allocator) that created it, whatever the holder of the
//! last reference knows about its type.

use std::marker::PhantomData ;
use std::mem::ManuallyDrop ;
use std::ops::Deref ;
use std::ptr::NonNull ;
use pipe_trait::Pipe ;

use crate::{ Castable, Interface, QueryError, RefCount, Unknown };
use crate::castable::{ lookup_cast, lookup_interface };



struct Hooks {
	destroy: unsafe fn( NonNull<ObjectHeader> ),
	castable: unsafe fn( NonNull<ObjectHeader> ) -> NonNull<dyn Castable>,
	type_name: fn() -> &'static str,
}

/// The type-erased prefix of every counted object.
///
/// This is all the other side of a boundary ever sees: an opaque pointer to it is
/// the object's identity, see [`Ref::into_raw`].
#[repr( C )]
pub struct ObjectHeader {
	count: RefCount,
	hooks: &'static Hooks,
}

impl ObjectHeader {

	#[inline] pub(crate) fn add_reference( &self ) -> u32 { self.count.increment() }

	#[inline] pub(crate) fn ref_count( &self ) -> u32 { self.count.get() }

	#[inline] pub(crate) fn type_name( &self ) -> &'static str { ( self.hooks.type_name )() }

	/// Gives up one reference, destroying the object if it was the last one.
	///
	/// # Safety
	/// `header` must point to a live object on which the caller holds a reference.
	/// The caller must not use that reference afterwards.
	pub(crate) unsafe fn release( header: NonNull<Self> ) -> u32 {
		// SAFETY: the caller holds a reference, so the object is alive until the
		// decrement. Nothing may be read from it afterwards unless it reached zero.
		let ( remaining, destroy ) = {
			let header = unsafe { header.as_ref() };
			let destroy = header.hooks.destroy ;
			( header.count.decrement(), destroy )
		};
		if remaining == 0 {
			// SAFETY: the count reached zero on this thread, nobody else can reach the object.
			unsafe { destroy( header ) };
		}
		remaining
	}

	/// The object viewed as [`Castable`].
	///
	/// # Safety
	/// `header` must point to a live object and the returned reference must not
	/// outlive the caller's reference to it.
	pub(crate) unsafe fn castable<'a>( header: NonNull<Self> ) -> &'a ( dyn Castable + 'static ) {
		// SAFETY: the hook returns a pointer into the same live allocation.
		unsafe { ( header.as_ref().hooks.castable )( header ).as_ref() }
	}

}

#[repr( C )]
struct Object<T> {
	header: ObjectHeader,
	value: T,
}

impl<T: Castable> Object<T> {

	fn allocate( value: T ) -> NonNull<Self> {
		Self {
			header: ObjectHeader {
				count: RefCount::new(),
				hooks: &Hooks {
					destroy: Self::destroy,
					castable: Self::castable,
					type_name: std::any::type_name::<T>,
				},
			},
			value,
		}
			.pipe( Box::new )
			.pipe( Box::leak )
			.pipe( NonNull::from )
	}

	unsafe fn destroy( header: NonNull<ObjectHeader> ) {
		tracing::trace!( object = std::any::type_name::<T>(), "destroying object" );
		// SAFETY: `header` is the first field of a `#[repr( C )]` `Object<T>` created by `allocate`.
		drop( unsafe { Box::from_raw( header.cast::<Self>().as_ptr() )});
	}

	unsafe fn castable( header: NonNull<ObjectHeader> ) -> NonNull<dyn Castable> {
		// SAFETY: `header` is the first field of a live `Object<T>`.
		let value = unsafe { &( *header.cast::<Self>().as_ptr() ).value };
		NonNull::from( value )
	}

}

/// An owning, reference-counted handle on an object, viewed through `I`.
///
/// `I` is either a concrete type or an interface trait object such as
/// `dyn Blob`. Every `Ref` accounts for exactly one reference:
///
/// - cloning it ([`Ref::add_reference`]) adds one,
/// - dropping it ([`Ref::release`] or going out of scope) gives it up,
/// - [`Ref::query_interface`] returns a new handle on another view of the same
/// 	object, adding one.
///
/// When the count reaches zero the object is destroyed on the releasing thread.
/// A released handle has been moved, so it can not be used afterwards.
///
/// Like [`Arc`]( std::sync::Arc ), the operations are associated functions so
/// they never shadow methods of the viewed interface.
///
/// ```
/// use castable::{ OwnedBlob, Ref };
///
/// let blob = OwnedBlob::create( "hello" );
/// assert_eq!( Ref::ref_count( &blob ), 1 );
///
/// let other = Ref::add_reference( &blob );
/// assert_eq!( Ref::ref_count( &blob ), 2 );
/// assert_eq!( other.as_bytes(), b"hello" );
///
/// assert_eq!( Ref::release( other ), 1 );
/// assert_eq!( Ref::release( blob ), 0 );
/// ```
pub struct Ref<I: ?Sized> {
	header: NonNull<ObjectHeader>,
	view: NonNull<I>,
	_owns: PhantomData<I>,
}

// SAFETY: the count is atomic and the view is only handed out as `&I`.
unsafe impl<I: ?Sized + Send + Sync> Send for Ref<I> {}
// SAFETY: as above.
unsafe impl<I: ?Sized + Send + Sync> Sync for Ref<I> {}

impl<T: Castable> Ref<T> {

	/// Moves `value` into a new counted object and returns the first reference to it.
	pub fn new( value: T ) -> Self {
		let object = Object::allocate( value );
		let header = object.cast::<ObjectHeader>();
		// SAFETY: the allocation was just created and is not shared yet.
		let view = NonNull::from( unsafe { &( *object.as_ptr() ).value });
		// SAFETY: as above.
		unsafe { header.as_ref() }.add_reference();
		Self { header, view, _owns: PhantomData }
	}

	/// Re-views the handle through a reference derived from the concrete value,
	/// typically an unsizing coercion to an interface trait object.
	///
	/// The reference count is unchanged; ownership moves to the returned handle.
	///
	/// ```
	/// use castable::{ Blob, OwnedBlob, Ref };
	///
	/// fn as_blob( blob: &OwnedBlob ) -> &( dyn Blob + 'static ) { blob }
	///
	/// let blob: Ref<dyn Blob> = Ref::map( Ref::new( OwnedBlob::new( "text" )), as_blob );
	/// assert_eq!( blob.buffer_size(), 4 );
	/// ```
	pub fn map<J: ?Sized + 'static>( this: Self, view: impl for<'a> FnOnce( &'a T ) -> &'a J ) -> Ref<J> {
		let this = ManuallyDrop::new( this );
		let view = NonNull::from( view( &**this ));
		Ref { header: this.header, view, _owns: PhantomData }
	}

}

impl<I: ?Sized> Ref<I> {

	/// Number of references currently held on the object.
	pub fn ref_count( this: &Self ) -> u32 { Self::header( this ).ref_count() }

	/// Adds a reference, returning a new handle on the same view.
	///
	/// This is what [`Clone`] does.
	pub fn add_reference( this: &Self ) -> Self {
		Self::header( this ).add_reference();
		Self { header: this.header, view: this.view, _owns: PhantomData }
	}

	/// Gives up this reference and returns the number that remain.
	///
	/// Returns 0 if this was the last reference, in which case the object has been
	/// destroyed by the time this returns.
	pub fn release( this: Self ) -> u32 {
		let this = ManuallyDrop::new( this );
		// SAFETY: `this` held a reference and is never used again.
		unsafe { ObjectHeader::release( this.header )}
	}

	/// Returns `true` if both handles refer to the same object, whatever their views.
	pub fn ptr_eq<J: ?Sized>( this: &Self, other: &Ref<J> ) -> bool {
		this.header == other.header
	}

	/// Hands the reference over as an opaque object pointer, for example to C.
	///
	/// The count is unchanged. Use [`Ref::from_raw`] to take it back.
	pub fn into_raw( this: Self ) -> NonNull<ObjectHeader> {
		ManuallyDrop::new( this ).header
	}

	#[inline]
	fn header( this: &Self ) -> &ObjectHeader {
		// SAFETY: a live `Ref` keeps the object alive.
		unsafe { this.header.as_ref() }
	}

}

impl Ref<dyn Castable> {

	/// Takes back a reference handed over with [`Ref::into_raw`].
	///
	/// # Safety
	/// `raw` must come from [`Ref::into_raw`] (of any view) and the reference it
	/// carries must not have been released or taken back already.
	pub unsafe fn from_raw( raw: NonNull<ObjectHeader> ) -> Self {
		// SAFETY: the caller transfers a live reference.
		let view = NonNull::from( unsafe { ObjectHeader::castable( raw )});
		Self { header: raw, view, _owns: PhantomData }
	}

}

impl<I: ?Sized + Unknown> Ref<I> {

	/// Requests interface `J` and returns a new reference on it.
	///
	/// On success the count is incremented by exactly one and the returned handle
	/// owns that reference. On failure the count is unchanged.
	///
	/// # Errors
	/// Returns [`QueryError::NoInterface`] if the object does not implement `J`.
	pub fn query_interface<J: ?Sized + Interface>( this: &Self ) -> Result<Ref<J>, QueryError> {
		let view = NonNull::from( lookup_interface::<I, J>( this )? );
		Self::header( this ).add_reference();
		Ok( Ref { header: this.header, view, _owns: PhantomData })
	}

	/// Re-views this reference as interface `J` without touching the count.
	///
	/// # Errors
	/// Returns the unchanged handle if the object does not implement `J`.
	pub fn into_interface<J: ?Sized + Interface>( this: Self ) -> Result<Ref<J>, Self> {
		let view = match lookup_interface::<I, J>( &this ) {
			Ok( view ) => NonNull::from( view ),
			Err( _ ) => return Err( this ),
		};
		let this = ManuallyDrop::new( this );
		Ok( Ref { header: this.header, view, _owns: PhantomData })
	}

}

impl<I: ?Sized + Castable> Ref<I> {

	/// Views the object as `J` without taking a new reference.
	///
	/// Besides interfaces, this also reaches concrete classes registered through
	/// [`Castable::object`]. The alias borrows `this`, so it can not outlive the
	/// reference it came from.
	pub fn cast_as<J: ?Sized + Interface>( this: &Self ) -> Option<&J> {
		lookup_cast::<I, J>( this )
	}

}

impl<I: ?Sized> Deref for Ref<I> {
	type Target = I ;
	fn deref( &self ) -> &I {
		// SAFETY: the view points into the object, which a live `Ref` keeps alive.
		unsafe { self.view.as_ref() }
	}
}

impl<I: ?Sized> Clone for Ref<I> {
	fn clone( &self ) -> Self { Self::add_reference( self ) }
}

impl<I: ?Sized> Drop for Ref<I> {
	fn drop( &mut self ) {
		// SAFETY: `self` holds a reference and is being dropped.
		unsafe { ObjectHeader::release( self.header ); }
	}
}

impl<I: ?Sized> std::fmt::Debug for Ref<I> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		let header = Self::header( self );
		f.debug_struct( "Ref" )
			.field( "object", &header.type_name() )
			.field( "ref_count", &header.ref_count() )
			.finish_non_exhaustive()
	}
}
