//! Interface identifiers.
//!
//! Every capability an object can expose is named by a 128-bit [`InterfaceId`].
//! Identifiers are compile-time constants attached to the capability type through
//! [`Interface::ID`]( crate::Interface::ID ); they are never generated at runtime.
//! Two identifiers are equal iff all 16 bytes match.

use std::collections::HashMap ;
use std::collections::hash_map::Entry ;
use std::str::FromStr ;
use itertools::Itertools ;
use thiserror::Error ;

use crate::{ Interface, Status };



/// A 128-bit identifier naming a capability "shape" (a method set and its semantics).
///
/// The layout matches a C GUID so the same value can be handed across a C boundary
/// unchanged. Equality is structural over all 16 bytes.
///
/// ```
/// use castable::InterfaceId ;
///
/// const MY_INTERFACE: InterfaceId = InterfaceId::new(
/// 	0x8ba5_fb08, 0x5195, 0x40e2, [ 0xac, 0x58, 0x0d, 0x98, 0x9c, 0x3a, 0x01, 0x02 ],
/// );
/// assert_eq!( MY_INTERFACE.to_string(), "8ba5fb08-5195-40e2-ac58-0d989c3a0102" );
/// assert_eq!( "8BA5FB08-5195-40E2-AC58-0D989C3A0102".parse(), Ok( MY_INTERFACE ));
/// ```
#[repr( C )]
#[derive( Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd )]
pub struct InterfaceId {
	data1: u32,
	data2: u16,
	data3: u16,
	data4: [u8; 8],
}

impl InterfaceId {

	/// Creates an identifier from its GUID fields.
	pub const fn new( data1: u32, data2: u16, data3: u16, data4: [u8; 8] ) -> Self {
		Self { data1, data2, data3, data4 }
	}

	/// Creates an identifier from its canonical byte form (fields in big-endian order).
	pub const fn from_bytes( bytes: [u8; 16] ) -> Self {
		let [ a0, a1, a2, a3, b0, b1, c0, c1, d0, d1, d2, d3, d4, d5, d6, d7 ] = bytes ;
		Self {
			data1: u32::from_be_bytes([ a0, a1, a2, a3 ]),
			data2: u16::from_be_bytes([ b0, b1 ]),
			data3: u16::from_be_bytes([ c0, c1 ]),
			data4: [ d0, d1, d2, d3, d4, d5, d6, d7 ],
		}
	}

	/// Returns the canonical byte form (fields in big-endian order).
	pub const fn to_bytes( &self ) -> [u8; 16] {
		let [ a0, a1, a2, a3 ] = self.data1.to_be_bytes();
		let [ b0, b1 ] = self.data2.to_be_bytes();
		let [ c0, c1 ] = self.data3.to_be_bytes();
		let [ d0, d1, d2, d3, d4, d5, d6, d7 ] = self.data4 ;
		[ a0, a1, a2, a3, b0, b1, c0, c1, d0, d1, d2, d3, d4, d5, d6, d7 ]
	}

	/// Structural equality usable in constant contexts.
	pub const fn const_eq( &self, other: &Self ) -> bool {
		let ( lhs, rhs ) = ( self.to_bytes(), other.to_bytes() );
		let mut index = 0 ;
		while index < 16 {
			if lhs[index] != rhs[index] { return false }
			index += 1 ;
		}
		true
	}

}

/// Returns `true` if no two identifiers in `ids` are equal.
///
/// Meant for `const` assertions over a crate's own identifiers:
///
/// ```
/// use castable::{ InterfaceId, all_distinct };
///
/// const A: InterfaceId = InterfaceId::new( 1, 0, 0, [ 0; 8 ]);
/// const B: InterfaceId = InterfaceId::new( 2, 0, 0, [ 0; 8 ]);
/// const _: () = assert!( all_distinct( &[ A, B ]));
/// ```
pub const fn all_distinct( ids: &[InterfaceId] ) -> bool {
	let mut i = 0 ;
	while i < ids.len() {
		let mut j = i + 1 ;
		while j < ids.len() {
			if ids[i].const_eq( &ids[j] ) { return false }
			j += 1 ;
		}
		i += 1 ;
	}
	true
}

impl std::fmt::Display for InterfaceId {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!(
			f,
			"{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{}",
			self.data1,
			self.data2,
			self.data3,
			self.data4[0],
			self.data4[1],
			self.data4[2..].iter().format_with( "", | byte, f | f( &format_args!( "{:02x}", byte ))),
		)
	}
}

impl FromStr for InterfaceId {
	type Err = InterfaceError ;

	/// Parses the `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form, in either case.
	fn from_str( text: &str ) -> Result<Self, Self::Err> {

		let malformed = || InterfaceError::Malformed( text.to_string() );

		let groups = text.split( '-' ).collect_vec();
		if groups.iter().map(| group | group.len() ).collect_vec() != [ 8, 4, 4, 4, 12 ] {
			return Err( malformed() );
		}

		let digits = groups.concat();
		if !digits.bytes().all(| digit | digit.is_ascii_hexdigit() ) {
			return Err( malformed() );
		}

		let mut bytes = [ 0_u8; 16 ];
		for ( byte, pair ) in bytes.iter_mut().zip( digits.as_bytes().chunks( 2 )) {
			let pair = std::str::from_utf8( pair ).map_err(|_| malformed() )?;
			*byte = u8::from_str_radix( pair, 16 ).map_err(|_| malformed() )?;
		}

		Ok( Self::from_bytes( bytes ))

	}
}

impl From<[u8; 16]> for InterfaceId {
	fn from( bytes: [u8; 16] ) -> Self { Self::from_bytes( bytes )}
}

impl From<InterfaceId> for [u8; 16] {
	fn from( id: InterfaceId ) -> Self { id.to_bytes() }
}

/// Errors produced while parsing or registering interface identifiers.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum InterfaceError {
	/// The text is not of the form `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
	#[error( "Malformed Interface Id: {0:?}" )] Malformed( String ),
	/// A different type already claimed this identifier.
	#[error( "Interface Id {id} is claimed by {existing}, refusing {claimant}" )]
	Conflict { id: InterfaceId, existing: &'static str, claimant: &'static str },
}

impl From<&InterfaceError> for Status {
	fn from( _: &InterfaceError ) -> Self { Status::INVALID_ARG }
}

/// Records which type claimed which identifier.
///
/// Within one process at most one capability type may claim an identifier. Rust
/// cannot enumerate every implementor of [`Interface`], so this table is opt-in:
/// components that load capability types from several sources can register them
/// here and get a [`InterfaceError::Conflict`] instead of silently aliasing two
/// different shapes.
///
/// Registering the same type twice is a no-op.
#[derive( Debug, Default, Clone )]
pub struct InterfaceRegistry {
	claims: HashMap<InterfaceId, &'static str>,
}

impl InterfaceRegistry {

	/// Creates an empty registry.
	pub fn new() -> Self { Self::default() }

	/// Creates a registry holding the capability types defined by this crate.
	pub fn with_builtins() -> Self {
		Self { claims: HashMap::from([
			claim_of::<dyn crate::Unknown>(),
			claim_of::<dyn crate::Castable>(),
			claim_of::<dyn crate::Blob>(),
			claim_of::<crate::OwnedBlob>(),
		])}
	}

	/// Claims `I::ID` for the interface type `I`.
	///
	/// # Errors
	/// Returns [`InterfaceError::Conflict`] if a different type already claimed the identifier.
	pub fn register<I: ?Sized + Interface>( &mut self ) -> Result<(), InterfaceError> {
		let ( id, name ) = claim_of::<I>();
		self.claim( id, name )
	}

	/// Claims `id` under an arbitrary type name.
	///
	/// # Errors
	/// Returns [`InterfaceError::Conflict`] if a different name already claimed the identifier.
	pub fn claim( &mut self, id: InterfaceId, claimant: &'static str ) -> Result<(), InterfaceError> {
		match self.claims.entry( id ) {
			Entry::Vacant( entry ) => { entry.insert( claimant ); Ok(()) }
			Entry::Occupied( entry ) if *entry.get() == claimant => Ok(()),
			Entry::Occupied( entry ) => Err( InterfaceError::Conflict { id, existing: *entry.get(), claimant }),
		}
	}

	/// Returns the name of the type that claimed `id`, if any.
	pub fn claimant( &self, id: &InterfaceId ) -> Option<&'static str> {
		self.claims.get( id ).copied()
	}

	#[inline] pub fn len( &self ) -> usize { self.claims.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.claims.is_empty() }

}

fn claim_of<I: ?Sized + Interface>() -> ( InterfaceId, &'static str ) {
	( I::ID, std::any::type_name::<I>() )
}

#[cfg( test )]
mod tests {

	use super::* ;

	const SAMPLE: InterfaceId = InterfaceId::new(
		0xf7e0_e93c, 0xde70, 0x4531, [ 0x9c, 0x9f, 0xdd, 0xa3, 0xf6, 0xc6, 0xc0, 0xdd ],
	);

	#[test]
	fn byte_form_is_big_endian_fields() {
		assert_eq!( SAMPLE.to_bytes(), [
			0xf7, 0xe0, 0xe9, 0x3c, 0xde, 0x70, 0x45, 0x31,
			0x9c, 0x9f, 0xdd, 0xa3, 0xf6, 0xc6, 0xc0, 0xdd,
		]);
		assert_eq!( InterfaceId::from_bytes( SAMPLE.to_bytes() ), SAMPLE );
	}

	#[test]
	fn layout_is_sixteen_bytes() {
		assert_eq!( std::mem::size_of::<InterfaceId>(), 16 );
	}

	#[test]
	fn display_and_parse_agree() {
		let text = SAMPLE.to_string();
		assert_eq!( text, "f7e0e93c-de70-4531-9c9f-dda3f6c6c0dd" );
		assert_eq!( text.parse::<InterfaceId>(), Ok( SAMPLE ));
	}

	#[test]
	fn parse_rejects_malformed_text() {
		for text in [
			"",
			"f7e0e93c-de70-4531-9c9f",
			"f7e0e93cde7045319c9fdda3f6c6c0dd",
			"f7e0e93c-de70-4531-9c9f-dda3f6c6c0d",
			"f7e0e93c-de70-4531-9c9f-dda3f6c6c0dz",
			"+7e0e93c-de70-4531-9c9f-dda3f6c6c0dd",
		] {
			assert_eq!(
				text.parse::<InterfaceId>(),
				Err( InterfaceError::Malformed( text.to_string() )),
				"accepted {:?}", text,
			);
		}
	}

	#[test]
	fn const_eq_matches_eq() {
		let other = InterfaceId::new( 0xf7e0_e93c, 0xde70, 0x4531, [ 0; 8 ]);
		assert!( SAMPLE.const_eq( &SAMPLE ));
		assert!( !SAMPLE.const_eq( &other ));
		assert!( all_distinct( &[ SAMPLE, other ]));
		assert!( !all_distinct( &[ SAMPLE, other, SAMPLE ]));
	}

	#[test]
	fn registry_rejects_second_claimant() {
		let mut registry = InterfaceRegistry::new();
		assert_eq!( registry.claim( SAMPLE, "first" ), Ok(()));
		assert_eq!( registry.claim( SAMPLE, "first" ), Ok(()));
		assert_eq!(
			registry.claim( SAMPLE, "second" ),
			Err( InterfaceError::Conflict { id: SAMPLE, existing: "first", claimant: "second" }),
		);
		assert_eq!( registry.claimant( &SAMPLE ), Some( "first" ));
		assert_eq!( registry.len(), 1 );
	}

}
