//! Runtime behavior of code expanded by `json_records!`.

mod people {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "aliases": {
            "PersonId": { "name": "PersonId", "type": "string", "description": "Stable person identifier." }
        },
        "records": {
            "Person": {
                "name": "Person",
                "description": "A person.",
                "fields": {
                    "id": { "name": "id", "type": "PersonId", "omit_empty": true },
                    "name": { "name": "name", "type": "*string", "required": true },
                    "age": { "name": "age", "type": "int", "omit_empty": true },
                    "tags": { "name": "tags", "type": "[]string", "omit_empty": true },
                    "secret": { "name": "secret", "type": "string", "marshal_name": "-" }
                }
            },
            "Team": {
                "name": "Team",
                "fields": {
                    "lead": { "name": "lead", "type": "*Person" },
                    "members": { "name": "members", "type": "[]Person", "omit_empty": true }
                }
            }
        }
    }"#
    );

    fn ada() -> Person {
        Person {
            name: Some("Ada".to_string()),
            ..Person::default()
        }
    }

    #[test]
    fn to_json_omits_empty_fields_and_skipped_names() {
        let person = Person {
            secret: "hidden".to_string(),
            ..ada()
        };
        assert_eq!(person.to_json().expect("serializes"), r#"{"name": "Ada"}"#);
    }

    #[test]
    fn to_json_writes_populated_fields_in_key_order() {
        let id: PersonId = "p-1".to_string();
        let person = Person {
            id,
            age: 36,
            tags: vec!["math".to_string()],
            ..ada()
        };
        assert_eq!(
            person.to_json().expect("serializes"),
            r#"{"age": 36, "id": "p-1", "name": "Ada", "tags": ["math"]}"#
        );
    }

    #[test]
    fn to_json_fails_on_absent_required_field() {
        let err = Person::default().to_json().expect_err("name is required");
        assert!(err.to_string().contains("name is a required field"), "{err}");
    }

    #[test]
    fn from_json_reads_known_keys_and_ignores_others() {
        let input: &str = r#"{"name": "Ada", "age": 36, "secret": "s", "extra": [1, 2]}"#;
        let person = Person::from_json(input).expect("deserializes");
        assert_eq!(
            person,
            Person {
                age: 36,
                secret: "s".to_string(),
                ..ada()
            }
        );
    }

    #[test]
    fn from_json_requires_required_keys() {
        let err = Person::from_json(r#"{"age": 3}"#).expect_err("name is missing");
        assert!(
            err.to_string().contains("\"name\" is required but was not present"),
            "{err}"
        );
    }

    #[test]
    fn from_json_treats_null_as_absent() {
        let person = Person::from_json(r#"{"name": "Ada", "age": null}"#).expect("deserializes");
        assert_eq!(person.age, 0);
        assert!(Person::from_json(r#"{"name": null}"#).is_err());
    }

    #[test]
    fn from_json_rejects_non_objects_and_bad_values() {
        assert!(Person::from_json("[]").is_err());
        assert!(Person::from_json(r#"{"name": "Ada", "age": "old"}"#).is_err());
    }

    #[test]
    fn to_map_projects_written_fields_only() {
        let map = Person {
            age: 36,
            secret: "s".to_string(),
            ..ada()
        }
        .to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["age", "id", "name", "tags"]);
        assert_eq!(map["age"], serde_json::json!(36));
        assert_eq!(map["name"], serde_json::json!("Ada"));
        assert_eq!(map["tags"], serde_json::json!([]));
    }

    #[test]
    fn serde_bridges_match_the_generated_routines() {
        let person = Person { age: 7, ..ada() };
        let via_serde: String = serde_json::to_string(&person).expect("serializes");
        assert_eq!(via_serde, person.to_json().expect("serializes"));
        let back: Person = serde_json::from_str(&via_serde).expect("deserializes");
        assert_eq!(back, person);
    }

    #[test]
    fn records_nest_through_the_serde_bridges() {
        let team = Team {
            lead: Some(Box::new(ada())),
            members: vec![Person {
                name: Some("Bob".to_string()),
                ..Person::default()
            }],
        };
        let json: String = team.to_json().expect("serializes");
        assert_eq!(json, r#"{"lead": {"name": "Ada"}, "members": [{"name": "Bob"}]}"#);
        assert_eq!(Team::from_json(&json).expect("deserializes"), team);

        let err = Team::from_json(r#"{"members": [{"age": 1}]}"#).expect_err("nested required");
        assert!(err.to_string().contains("is required"), "{err}");

        let keys: Vec<String> = team.to_map().into_keys().collect();
        assert_eq!(keys, vec!["lead".to_string(), "members".to_string()]);
    }

    #[test]
    fn nested_failures_abort_serialization() {
        let team = Team {
            lead: Some(Box::new(Person::default())),
            members: Vec::new(),
        };
        assert!(team.to_json().is_err());
    }
}

mod coercion {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "records": {
            "Account": {
                "name": "Account",
                "fields": {
                    "balance": { "name": "balance", "type": "int", "unmarshal_type": "string" },
                    "code": { "name": "code", "type": "string", "unmarshal_type": "int" }
                }
            }
        }
    }"#
    );

    #[test]
    fn reads_text_into_integers_and_integers_into_text() {
        let account = Account::from_json(r#"{"balance": "-42", "code": 7}"#).expect("deserializes");
        assert_eq!(
            account,
            Account {
                balance: -42,
                code: "7".to_string(),
            }
        );
        assert_eq!(
            account.to_json().expect("serializes"),
            r#"{"balance": -42, "code": "7"}"#
        );
    }

    #[test]
    fn rejects_values_that_do_not_coerce() {
        assert!(Account::from_json(r#"{"balance": "4x2"}"#).is_err());
        assert!(Account::from_json(r#"{"balance": 42}"#).is_err());
        assert!(Account::from_json(r#"{"code": "7"}"#).is_err());
    }

    #[test]
    fn map_view_uses_the_declared_types() {
        let map = Account {
            balance: 5,
            code: "x".to_string(),
        }
        .to_map();
        assert_eq!(map["balance"], serde_json::json!(5));
        assert_eq!(map["code"], serde_json::json!("x"));
    }
}

mod additional {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "records": {
            "Bag": {
                "name": "Bag",
                "additional_type": "float64",
                "fields": { "label": { "name": "label", "type": "string" } }
            },
            "Closed": {
                "name": "Closed",
                "additional_type": "false",
                "fields": { "type": { "name": "type", "type": "string", "omit_empty": true } }
            },
            "Marker": { "name": "Marker" }
        }
    }"#
    );

    #[test]
    fn unknown_keys_are_captured_and_written_back_sorted() {
        let bag = Bag::from_json(r#"{"label": "x", "b": 2.5, "a": 1}"#).expect("deserializes");
        assert_eq!(bag.label, "x");
        let keys: Vec<&str> = bag.additional_properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!((bag.additional_properties["b"] - 2.5).abs() < f64::EPSILON);
        assert_eq!(
            bag.to_json().expect("serializes"),
            r#"{"label": "x", "a": 1.0, "b": 2.5}"#
        );
    }

    #[test]
    fn additional_values_must_decode_as_the_declared_type() {
        assert!(Bag::from_json(r#"{"a": "nope"}"#).is_err());
    }

    #[test]
    fn additional_properties_stay_out_of_the_map_view() {
        let bag = Bag::from_json(r#"{"label": "x", "a": 1}"#).expect("deserializes");
        let keys: Vec<String> = bag.to_map().into_keys().collect();
        assert_eq!(keys, vec!["label".to_string()]);
    }

    #[test]
    fn disallowed_additional_properties_are_skipped() {
        let closed = Closed::from_json(r#"{"type": "t", "other": 1}"#).expect("deserializes");
        assert_eq!(closed.r#type, "t");
        assert_eq!(closed.to_json().expect("serializes"), r#"{"type": "t"}"#);
        assert_eq!(Closed::default().to_json().expect("serializes"), "{}");
        assert_eq!(closed.to_map().len(), 1);
    }

    #[test]
    fn empty_records_still_require_an_object() {
        assert_eq!(Marker::from_json("{}").expect("deserializes"), Marker {});
        assert_eq!(Marker::from_json(r#"{"a": 1}"#).expect("deserializes"), Marker {});
        assert!(Marker::from_json("[]").is_err());
        assert_eq!(Marker {}.to_json().expect("serializes"), "{}");
        assert!(Marker {}.to_map().is_empty());
    }
}

mod declarations {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "records": {
            "Address": {
                "name": "Address",
                "generate_code": false,
                "fields": {
                    "street": { "name": "street", "type": "string", "marshal_name": "street_name", "unmarshal_name": "street_name" },
                    "zip": { "name": "zip", "type": "*string" }
                }
            },
            "Place": {
                "name": "Place",
                "fields": {
                    "address": { "name": "address", "type": "Address", "omit_empty": true },
                    "name": { "name": "name", "type": "string" }
                }
            }
        }
    }"#
    );

    #[test]
    fn structural_empty_check_omits_default_records() {
        let place = Place {
            name: "home".to_string(),
            ..Place::default()
        };
        assert_eq!(place.to_json().expect("serializes"), r#"{"name": "home"}"#);
    }

    #[test]
    fn declaration_only_records_use_derived_serde() {
        let input: &str = r#"{"name": "home", "address": {"street_name": "Main", "zip": "123"}}"#;
        let place = Place::from_json(input).expect("deserializes");
        assert_eq!(
            place.address,
            Address {
                street: "Main".to_string(),
                zip: Some("123".to_string()),
            }
        );
        assert_eq!(
            place.to_json().expect("serializes"),
            r#"{"address": {"street_name":"Main","zip":"123"}, "name": "home"}"#
        );
        let keys: Vec<String> = place.to_map().into_keys().collect();
        assert_eq!(keys, vec!["address".to_string(), "name".to_string()]);
    }

    #[test]
    fn derived_defaults_fill_missing_fields() {
        let address: Address = serde_json::from_str("{}").expect("deserializes");
        assert_eq!(address, Address::default());
    }
}

mod plain_required {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "records": {
            "Person": {
                "name": "Person",
                "fields": {
                    "name": { "name": "name", "type": "string", "required": true },
                    "age": { "name": "age", "type": "int", "omit_empty": true }
                }
            }
        }
    }"#
    );

    #[test]
    fn required_text_fields_expand_and_write() {
        let ann = Person {
            name: "Ann".to_string(),
            age: 0,
        };
        assert_eq!(ann.to_json().expect("serializes"), r#"{"name": "Ann"}"#);
        assert_eq!(Person::default().to_json().expect("serializes"), r#"{"name": ""}"#);
    }

    #[test]
    fn required_text_fields_are_checked_on_read() {
        let person = Person::from_json(r#"{"name":"Ann","age":5}"#).expect("deserializes");
        assert_eq!(
            person,
            Person {
                name: "Ann".to_string(),
                age: 5,
            }
        );
        assert!(Person::from_json(r#"{"age":5}"#).is_err());

        let keys: Vec<String> = person.to_map().into_keys().collect();
        assert_eq!(keys, vec!["age".to_string(), "name".to_string()]);
    }
}

mod reserved_names {
    use json_record_codegen_macro::json_records;

    json_records!(
        r#"{
        "records": {
            "Option": {
                "name": "Option",
                "fields": { "on": { "name": "on", "type": "bool", "omit_empty": true } }
            },
            "Holder": {
                "name": "Holder",
                "fields": {
                    "o": { "name": "o", "type": "*Option" },
                    "p": { "name": "p", "type": "*string" }
                }
            }
        }
    }"#
    );

    #[test]
    fn records_named_like_std_types_get_a_suffix() {
        let holder = Holder {
            o: Some(Box::new(Option_ { on: true })),
            p: Some("x".to_string()),
        };
        let json: String = holder.to_json().expect("serializes");
        assert_eq!(json, r#"{"o": {"on": true}, "p": "x"}"#);
        assert_eq!(Holder::from_json(&json).expect("deserializes"), holder);
        assert_eq!(holder.to_map()["p"], serde_json::json!("x"));
    }

    #[test]
    fn suffixed_records_keep_their_own_routines() {
        let off: Option_ = Option_::from_json(r#"{"on": false}"#).expect("deserializes");
        assert_eq!(off, Option_::default());
        assert_eq!(off.to_json().expect("serializes"), "{}");
        assert_eq!(Option_ { on: true }.to_map()["on"], serde_json::json!(true));
    }
}
