//! Byte buffers that can cross a component boundary.
//!
//! There are two kinds of blob and they are different types:
//!
//! - [`OwnedBlob`] owns its bytes and lives in a counted object; it is freed when
//! 	its last [`Ref`] is released.
//! - [`BlobView`] borrows memory owned by someone else. It never frees it and its
//! 	reference operations do nothing. The safe way to get one is
//! 	[`BlobView::borrow`], which ties it to the lender's lifetime.
//!
//! Either kind can be passed wherever "a blob" is expected through [`BlobRef`].

use std::any::Any ;
use std::ffi::CStr ;
use std::marker::PhantomData ;
use std::ops::Deref ;
use std::ptr::NonNull ;
use std::str::Utf8Error ;

use crate::{ Castable, Handle, Interface, InterfaceId, Ref, Unknown, View };
use crate::handle::INERT_REF_COUNT ;



/// A read-only, contiguous range of bytes.
///
/// Implementors only provide [`as_bytes`](Self::as_bytes); the pointer and size
/// accessors used across a boundary are derived from it and therefore always
/// agree with each other.
pub trait Blob: Castable {

	/// The bytes of this blob.
	fn as_bytes( &self ) -> &[u8] ;

	/// Start of the byte range.
	///
	/// Valid for as long as the blob is: until its last reference is released for
	/// a counted blob, or for as long as the lender keeps the memory for a view.
	fn buffer_pointer( &self ) -> *const u8 { self.as_bytes().as_ptr() }

	/// Number of bytes readable at [`buffer_pointer`](Self::buffer_pointer).
	fn buffer_size( &self ) -> usize { self.as_bytes().len() }

	/// The bytes as UTF-8 text.
	///
	/// # Errors
	/// Returns the UTF-8 error if the bytes are not valid text.
	fn as_str( &self ) -> Result<&str, Utf8Error> { std::str::from_utf8( self.as_bytes() )}

}

impl Interface for dyn Blob {
	const ID: InterfaceId = InterfaceId::new(
		0x8ba5_fb08, 0x5195, 0x40e2, [ 0xac, 0x58, 0x0d, 0x98, 0x9c, 0x3a, 0x01, 0x02 ],
	);
	fn from_view<'a>( view: View<'a> ) -> Option<&'a Self> { match view {
		View::Blob( blob ) => Some( blob ),
		_ => None,
	}}
}

/// The interface table shared by every blob type.
fn blob_interface<'a, B: Blob>( blob: &'a B, id: &InterfaceId ) -> Option<View<'a>> {
	const UNKNOWN: InterfaceId = <dyn Unknown as Interface>::ID ;
	const CASTABLE: InterfaceId = <dyn Castable as Interface>::ID ;
	const BLOB: InterfaceId = <dyn Blob as Interface>::ID ;
	match *id {
		UNKNOWN => Some( View::Unknown( blob )),
		CASTABLE => Some( View::Castable( blob )),
		BLOB => Some( View::Blob( blob )),
		_ => None,
	}
}

/// A blob that owns its bytes.
///
/// The length is captured when the blob is built. The storage also carries one
/// NUL byte past the end, not counted in the size, so a C consumer may read
/// [`buffer_pointer`]( Blob::buffer_pointer ) as a C string. Data containing
/// interior NUL bytes is still reported at its full length.
///
/// ```
/// use castable::OwnedBlob ;
///
/// let blob = OwnedBlob::create( "hello" );
/// assert_eq!( blob.buffer_size(), 5 );
/// assert_eq!( blob.as_str(), Ok( "hello" ));
/// ```
pub struct OwnedBlob {
	storage: Box<[u8]>,
}

impl OwnedBlob {

	/// Takes ownership of `bytes`.
	pub fn new( bytes: impl Into<Vec<u8>> ) -> Self {
		let mut storage = bytes.into();
		storage.push( 0 );
		Self { storage: storage.into_boxed_slice() }
	}

	/// Copies the text of a C string, without its terminator.
	pub fn from_c_str( text: &CStr ) -> Self { Self::new( text.to_bytes() )}

	/// Builds a blob and returns the first reference to it, viewed as a [`Blob`].
	pub fn create( bytes: impl Into<Vec<u8>> ) -> Ref<dyn Blob> {
		Ref::map( Ref::new( Self::new( bytes )), as_blob )
	}

}

fn as_blob( blob: &OwnedBlob ) -> &( dyn Blob + 'static ) { blob }

impl Blob for OwnedBlob {
	fn as_bytes( &self ) -> &[u8] {
		&self.storage[ ..self.storage.len() - 1 ]
	}
}

impl Unknown for OwnedBlob {
	fn interface( &self, id: &InterfaceId ) -> Option<View<'_>> { blob_interface( self, id )}
}

impl Castable for OwnedBlob {
	fn object( &self, id: &InterfaceId ) -> Option<&( dyn Any + 'static )> {
		( *id == Self::ID ).then_some( self as &( dyn Any + 'static ))
	}
}

impl Interface for OwnedBlob {
	const ID: InterfaceId = InterfaceId::new(
		0xf7e0_e93c, 0xde70, 0x4531, [ 0x9c, 0x9f, 0xdd, 0xa3, 0xf6, 0xc6, 0xc0, 0xdd ],
	);
	fn from_view<'a>( view: View<'a> ) -> Option<&'a Self> { match view {
		View::Object( object ) => object.downcast_ref(),
		_ => None,
	}}
}

impl From<&CStr> for OwnedBlob {
	fn from( text: &CStr ) -> Self { Self::from_c_str( text )}
}

impl std::fmt::Debug for OwnedBlob {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "OwnedBlob" ).field( "size", &self.buffer_size() ).finish()
	}
}

/// A blob over memory owned by someone else.
///
/// It never frees that memory and does not take part in reference counting:
/// [`add_reference`](Self::add_reference) and [`release`](Self::release) always
/// return the same constant. Its reference operations being inert is visible in
/// the type. Hand it on as a [`BlobRef`] borrow; a view moved into a [`Ref`]
/// becomes a counted object like any other, and freeing it still leaves the lent
/// memory alone.
///
/// ```
/// use castable::{ Blob, BlobView };
///
/// let source = String::from( "float4 main() : SV_Target { return 1; }" );
/// let view = BlobView::borrow( source.as_bytes() );
/// assert_eq!( view.buffer_size(), source.len() );
/// assert_eq!( view.release(), view.add_reference() );
/// ```
pub struct BlobView {
	data: NonNull<u8>,
	len: usize,
}

// SAFETY: the view only reads the lent bytes and the lender keeps them alive and unchanged.
unsafe impl Send for BlobView {}
// SAFETY: as above.
unsafe impl Sync for BlobView {}

impl BlobView {

	/// Borrows `bytes` for as long as the returned guard lives.
	pub fn borrow( bytes: &[u8] ) -> Borrowed<'_> {
		Borrowed {
			view: Self { data: NonNull::from( bytes ).cast(), len: bytes.len() },
			_lender: PhantomData,
		}
	}

	/// Wraps `len` bytes at `data` without borrowing them.
	///
	/// A null `data` is accepted when `len` is 0.
	///
	/// # Safety
	/// `data` must be valid for reads of `len` bytes, and those bytes must not be
	/// changed or freed for as long as the view, or anything it was handed to, may
	/// still read them. That includes every reference on a [`Ref`] the view was
	/// moved into. The protocol can not check this.
	pub unsafe fn from_raw_parts( data: *const u8, len: usize ) -> Self {
		Self { data: NonNull::new( data.cast_mut() ).unwrap_or( NonNull::dangling() ), len }
	}

	/// Does nothing; returns [`INERT_REF_COUNT`]( crate::INERT_REF_COUNT ).
	#[inline] pub fn add_reference( &self ) -> u32 { INERT_REF_COUNT }

	/// Does nothing; returns [`INERT_REF_COUNT`]( crate::INERT_REF_COUNT ).
	#[inline] pub fn release( &self ) -> u32 { INERT_REF_COUNT }

}

impl Blob for BlobView {
	fn as_bytes( &self ) -> &[u8] {
		// SAFETY: upheld by the lender, see `borrow` and `from_raw_parts`.
		unsafe { std::slice::from_raw_parts( self.data.as_ptr(), self.len ) }
	}
}

impl Unknown for BlobView {
	fn interface( &self, id: &InterfaceId ) -> Option<View<'_>> { blob_interface( self, id )}
}

impl Castable for BlobView {}

impl std::fmt::Debug for BlobView {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "BlobView" ).field( "size", &self.len ).finish()
	}
}

/// A [`BlobView`] that borrows its bytes for `'a`.
///
/// Created by [`BlobView::borrow`]. The view can only be reached through this
/// guard, so it can not outlive the lent bytes.
pub struct Borrowed<'a> {
	view: BlobView,
	_lender: PhantomData<&'a [u8]>,
}

impl Deref for Borrowed<'_> {
	type Target = BlobView ;
	fn deref( &self ) -> &BlobView { &self.view }
}

impl std::fmt::Debug for Borrowed<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "Borrowed" ).field( &self.view ).finish()
	}
}

/// A blob handed over either with a reference or as a borrow.
pub type BlobRef<'a> = Handle<'a, dyn Blob> ;

impl<'a> From<&'a BlobView> for BlobRef<'a> {
	fn from( view: &'a BlobView ) -> Self { Handle::Borrowed( view )}
}

impl<'a> From<&'a Borrowed<'_>> for BlobRef<'a> {
	fn from( view: &'a Borrowed<'_> ) -> Self { Handle::Borrowed( &view.view )}
}

impl From<OwnedBlob> for BlobRef<'_> {
	fn from( blob: OwnedBlob ) -> Self { Handle::Counted( Ref::map( Ref::new( blob ), as_blob ))}
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn owned_size_excludes_terminator() {
		let blob = OwnedBlob::new( "hello" );
		assert_eq!( blob.buffer_size(), 5 );
		// SAFETY: the storage keeps one NUL byte past the reported size.
		let terminator = unsafe { *blob.buffer_pointer().add( 5 ) };
		assert_eq!( terminator, 0 );
	}

	#[test]
	fn owned_size_is_stored_not_scanned() {
		let blob = OwnedBlob::new( b"ab\0cd".as_slice() );
		assert_eq!( blob.buffer_size(), 5 );
		assert_eq!( blob.as_bytes(), b"ab\0cd" );
	}

	#[test]
	fn owned_from_c_str_drops_terminator() {
		let blob = OwnedBlob::from( c"kernel" );
		assert_eq!( blob.as_bytes(), b"kernel" );
	}

	#[test]
	fn empty_blobs() {
		assert_eq!( OwnedBlob::new( "" ).buffer_size(), 0 );
		// SAFETY: zero bytes are read from a null pointer.
		let view = unsafe { BlobView::from_raw_parts( std::ptr::null(), 0 ) };
		assert_eq!( view.as_bytes(), b"" );
	}

	#[test]
	fn blob_interface_table() {
		let blob = OwnedBlob::new( "x" );
		assert!( matches!( blob.interface( &<dyn Unknown>::ID ), Some( View::Unknown( _ ))));
		assert!( matches!( blob.interface( &<dyn Castable>::ID ), Some( View::Castable( _ ))));
		assert!( matches!( blob.interface( &<dyn Blob>::ID ), Some( View::Blob( _ ))));
		assert!( blob.interface( &OwnedBlob::ID ).is_none() );
		assert!( matches!( blob.cast_as( &OwnedBlob::ID ), Some( View::Object( _ ))));
	}

}
