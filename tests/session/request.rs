use castable::{ BlobView, Handle, OwnedBlob };
use castable::session::{ CompileRequest, Target };

#[test]
fn request_defaults() {
	let request = CompileRequest::new( Target::Spirv );
	assert_eq!( request.target(), Target::Spirv );
	assert!( !request.whole_program() );
	assert!( request.units().is_empty() );
}

#[test]
fn request_keeps_units_in_order() {

	let header = BlobView::borrow( b"#pragma once" );
	let request = CompileRequest::new( Target::Cpp )
		.with_source( "header.slang", &header )
		.with_source( "body.slang", OwnedBlob::new( "int x;" ));

	let labels = request.units().iter().map(| unit | unit.label() ).collect::<Vec<_>>();
	assert_eq!( labels, [ "header.slang", "body.slang" ]);

	let units = request.units();
	assert!( !Handle::is_counted( units[ 0 ].source() ));
	assert!( Handle::is_counted( units[ 1 ].source() ));
	assert_eq!( units[ 1 ].source().as_bytes(), b"int x;" );

}

#[test]
fn targets_display_their_names() {
	let names = [ Target::HostCallable, Target::SharedLibrary, Target::Spirv, Target::Dxil, Target::Cpp ]
		.map(| target | target.to_string() );
	assert_eq!( names, [ "host-callable", "shared-library", "spirv", "dxil", "cpp" ]);
}
