//! C entry points.
//!
//! Objects cross the boundary as opaque `castable_object` pointers. A pointer
//! returned by [`castable_blob_create`] or [`castable_query_interface`] carries
//! one reference that the caller gives up with [`castable_release`]. Pointers
//! returned by [`castable_cast_as`] carry none.
//!
//! Borrowed views are not exposed here: every object behind a
//! `castable_object` is counted.
#![allow( non_camel_case_types )]

use std::ptr::{ self, NonNull };

use crate::{ Blob, InterfaceId, OwnedBlob, Ref, Status };
use crate::object::ObjectHeader ;



/// An opaque counted object.
pub type castable_object = ObjectHeader ;

/// Copies `len` bytes at `data` into a new blob and stores its first reference
/// in `out`.
///
/// # Safety
/// `data` must be valid for reads of `len` bytes, or null with `len` 0. `out` must
/// be valid for a pointer write.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_blob_create(
	data: *const u8,
	len: usize,
	out: *mut *mut castable_object,
) -> i32 {
	if out.is_null() || ( data.is_null() && len != 0 ) {
		tracing::error!( "castable_blob_create: null pointer" );
		return Status::POINTER.into()
	}
	let bytes = match len {
		0 => &[][..],
		// SAFETY: the caller guarantees `len` readable bytes at `data`.
		_ => unsafe { std::slice::from_raw_parts( data, len )},
	};
	let blob = OwnedBlob::create( bytes );
	// SAFETY: `out` was checked for null; the caller guarantees it is writable.
	unsafe { out.write( Ref::into_raw( blob ).as_ptr() )};
	Status::OK.into()
}

/// Adds a reference and returns the new count, or 0 for a null `object`.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_add_ref( object: *mut castable_object ) -> u32 {
	let Some( object ) = NonNull::new( object ) else {
		tracing::error!( "castable_add_ref: null pointer" );
		return 0
	};
	// SAFETY: the caller holds a reference, so the object is alive.
	unsafe { object.as_ref() }.add_reference()
}

/// Gives up a reference and returns the remaining count, or 0 for a null
/// `object`. The object is destroyed when the count reaches 0.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference
/// it does not use afterwards.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_release( object: *mut castable_object ) -> u32 {
	let Some( object ) = NonNull::new( object ) else {
		tracing::error!( "castable_release: null pointer" );
		return 0
	};
	// SAFETY: the caller transfers its reference.
	unsafe { ObjectHeader::release( object )}
}

/// Requests interface `id`. On success stores a new reference in `out` and
/// returns `S_OK`; otherwise stores null and returns `E_NOINTERFACE`.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference.
/// `id` must be null or valid for reads. `out` must be null or valid for a
/// pointer write.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_query_interface(
	object: *mut castable_object,
	id: *const InterfaceId,
	out: *mut *mut castable_object,
) -> i32 {
	if out.is_null() {
		tracing::error!( "castable_query_interface: null pointer" );
		return Status::POINTER.into()
	}
	// SAFETY: `out` was checked for null; the caller guarantees it is writable.
	unsafe { out.write( ptr::null_mut() )};
	// SAFETY: the caller guarantees `id` is null or readable.
	let ( Some( object ), Some( id )) = ( NonNull::new( object ), unsafe { id.as_ref() }) else {
		tracing::error!( "castable_query_interface: null pointer" );
		return Status::POINTER.into()
	};
	// SAFETY: the caller holds a reference, so the object is alive.
	let found = unsafe { ObjectHeader::castable( object )}.interface( id ).is_some();
	if !found { return Status::NO_INTERFACE.into() }
	// SAFETY: as above.
	unsafe { object.as_ref() }.add_reference();
	// SAFETY: as above.
	unsafe { out.write( object.as_ptr() )};
	Status::OK.into()
}

/// Returns `object` if it can be viewed as `id`, null otherwise. The count is
/// unchanged and the result is only valid while the caller's reference is.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference.
/// `id` must be null or valid for reads.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_cast_as(
	object: *mut castable_object,
	id: *const InterfaceId,
) -> *mut castable_object {
	// SAFETY: the caller guarantees `id` is null or readable.
	let ( Some( header ), Some( id )) = ( NonNull::new( object ), unsafe { id.as_ref() }) else {
		tracing::error!( "castable_cast_as: null pointer" );
		return ptr::null_mut()
	};
	// SAFETY: the caller holds a reference, so the object is alive.
	match unsafe { ObjectHeader::castable( header )}.cast_as( id ) {
		Some( _ ) => object,
		None => ptr::null_mut(),
	}
}

/// Start of a blob's bytes, or null if `object` is null or not a blob.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_blob_buffer_pointer( object: *mut castable_object ) -> *const u8 {
	// SAFETY: forwarded to the caller.
	unsafe { with_blob( object, "castable_blob_buffer_pointer", | blob | blob.buffer_pointer() )}
		.unwrap_or( ptr::null() )
}

/// Number of bytes in a blob, or 0 if `object` is null or not a blob.
///
/// # Safety
/// `object` must be null or a live object on which the caller holds a reference.
#[unsafe( no_mangle )]
pub unsafe extern "C" fn castable_blob_buffer_size( object: *mut castable_object ) -> usize {
	// SAFETY: forwarded to the caller.
	unsafe { with_blob( object, "castable_blob_buffer_size", | blob | blob.buffer_size() )}
		.unwrap_or( 0 )
}

/// # Safety
/// As for the callers.
unsafe fn with_blob<R>(
	object: *mut castable_object,
	entry_point: &'static str,
	read: impl FnOnce( &( dyn Blob + 'static )) -> R,
) -> Option<R> {
	let Some( object ) = NonNull::new( object ) else {
		tracing::error!( entry_point, "null pointer" );
		return None
	};
	// SAFETY: the caller holds a reference, so the object is alive.
	let castable = unsafe { ObjectHeader::castable( object )};
	crate::castable::lookup_interface::<_, dyn Blob>( castable ).ok().map( read )
}
