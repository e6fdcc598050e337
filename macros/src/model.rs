use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(attributes(model), forward_attrs(doc, serde, validate, schemars))]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,

	/// Set once on creation, never part of an update.
	#[darling(default)]
	immutable: bool,
}

struct InputField<'a> {
	attrs: &'a [syn::Attribute],
	ident: &'a syn::Ident,
	ty: &'a syn::Type,
	vis: &'a syn::Visibility,
	immutable: bool,
}

/// Returns `true` for fields the server assigns, i.e. those with
/// `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
fn is_server_assigned(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	// `#[model(..)]` is only meaningful to this macro, so it is removed from the emitted model.
	if let syn::Data::Struct(ref mut data) = input.data {
		for field in &mut data.fields {
			field.attrs.retain(|attr| !attr.path().is_ident("model"));
		}
	}

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}", ident);
	let update_ident = format_ident!("Update{}", ident);

	let attrs = &receiver.attrs;

	let Some(fields) = receiver.data.as_ref().take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter_map(|field| {
			if is_server_assigned(&field.attrs) {
				return None;
			}

			Some(InputField {
				attrs: &field.attrs,
				ident: field.ident.as_ref()?,
				ty: &field.ty,
				vis: &field.vis,
				immutable: field.immutable,
			})
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|field| {
		let InputField {
			attrs,
			ident,
			ty,
			vis,
			..
		} = field;

		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	let update_fields = fields.iter().filter(|field| !field.immutable).map(|field| {
		let InputField {
			attrs,
			ident,
			ty,
			vis,
			..
		} = field;

		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	quote! {
		#input

		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
