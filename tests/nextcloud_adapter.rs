// crates.io
use serde_json::json;
// self
use nextcloud_oauth2::{
	auth::AccessToken,
	path,
	provider::{Nextcloud, ProviderAdapter, ProviderConfig, UserInfoSchema},
};

fn adapter(schema: UserInfoSchema) -> Nextcloud {
	let config = ProviderConfig::builder("https://mock.nextcloud")
		.client_id("mock_client_id")
		.client_secret("mock_secret")
		.redirect_uri("https://app.example.com/callback")
		.build()
		.expect("Fixture config should build.");

	Nextcloud::new(config).with_schema(schema)
}

#[test]
fn ocs_payload_round_trips_through_the_owner() {
	let adapter = adapter(UserInfoSchema::Ocs);
	let payload = json!({
		"ocs": {
			"meta": { "status": "ok", "statuscode": 200 },
			"data": { "id": 7, "display-name": "Ann", "email": "a@x.com", "groups": ["g1", "g2"] },
		},
	});

	adapter.validate(&payload, 200).expect("OCS payloads without errors should validate.");

	let owner = adapter.wrap_resource_owner(payload);

	assert_eq!(owner.id().as_deref(), Some("7"));
	assert_eq!(owner.name(), Some("Ann"));
	assert_eq!(owner.email(), Some("a@x.com"));
	assert_eq!(owner.groups(), Some(vec!["g1".to_owned(), "g2".to_owned()]));
	assert_eq!(
		serde_json::Value::Object(owner.to_map()),
		json!({ "id": 7, "display-name": "Ann", "email": "a@x.com", "groups": ["g1", "g2"] })
	);
}

#[test]
fn missing_fields_read_as_absent() {
	let owner = adapter(UserInfoSchema::Ocs).wrap_resource_owner(json!({ "ocs": { "data": {} } }));

	assert_eq!(owner.id(), None);
	assert_eq!(owner.name(), None);
	assert_eq!(owner.email(), None);
	assert_eq!(owner.groups(), None);
	assert!(owner.to_map().is_empty());

	let owner = adapter(UserInfoSchema::Ocs).wrap_resource_owner(json!({ "unrelated": true }));

	assert_eq!(owner.id(), None);
	assert!(owner.to_map().is_empty());
}

#[test]
fn oidc_payload_reads_flat_claims() {
	let payload = json!({ "sub": "ann", "name": "Ann", "email": "a@x.com" });
	let owner = adapter(UserInfoSchema::Oidc).wrap_resource_owner(payload.clone());

	assert_eq!(owner.id().as_deref(), Some("ann"));
	assert_eq!(owner.name(), Some("Ann"));
	assert_eq!(owner.email(), Some("a@x.com"));
	assert_eq!(owner.groups(), None);
	assert_eq!(serde_json::Value::Object(owner.to_map()), payload);
	assert_eq!(serde_json::to_value(&owner).expect("Owners should serialize."), payload);
}

#[test]
fn validation_matches_error_shapes_for_every_status() {
	let adapter = adapter(UserInfoSchema::Ocs);

	for status in [200, 201, 400, 401, 500] {
		assert!(adapter.validate(&json!({}), status).is_ok());
		assert!(adapter.validate(&json!({ "other": "fields" }), status).is_ok());

		let err = adapter
			.validate(&json!({ "error": "boom" }), status)
			.expect_err("Plain errors must fail validation.");

		assert_eq!((err.message.as_str(), err.code), ("boom", 0));

		let err = adapter
			.validate(&json!({ "error": { "message": "boom", "code": 42 } }), status)
			.expect_err("Structured errors must fail validation.");

		assert_eq!((err.message.as_str(), err.code), ("boom", 42));
	}
}

#[test]
fn minimal_token_body_maps_to_a_plain_token() {
	let adapter = adapter(UserInfoSchema::Ocs);
	let token = AccessToken::from_body(
		&json!({ "access_token": "T", "token_type": "bearer" }),
		adapter.access_token_resource_owner_id(),
		time::OffsetDateTime::now_utc(),
	)
	.expect("Minimal token bodies should parse.");

	assert_eq!(token.access_token.expose(), "T");
	assert_eq!(token.expires_at, None);
	assert_eq!(token.refresh_token, None);
	assert_eq!(token.resource_owner_id, None);
}

#[test]
fn path_resolution_is_total() {
	let doc = json!({ "a": { "b": [1, 2], "c": null }, "x.y": "literal", "s": "text" });

	assert_eq!(path::resolve_path(&doc, "a.b"), Some(&json!([1, 2])));
	assert_eq!(path::resolve_path(&doc, "x.y"), Some(&json!("literal")));

	for missing in ["", ".", "a..b", "a.b.0", "a.c", "s.t", "nope", "a.b.c.d.e"] {
		assert_eq!(path::resolve_path(&doc, missing), None, "`{missing}` must be absent.");
	}
}
