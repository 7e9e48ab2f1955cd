mod support;

use betslip_core::{ApiFeedInput, LlmProviderInput, ModelTokenCostInput, SportInput};
use serde_json::json;
use support::{create_model, model_input, setup_db};

#[test]
fn active_model_lookup_includes_provider() {
    let test_db = setup_db();
    let db = &test_db.db;
    let provider = db
        .create_provider(&LlmProviderInput {
            name: "OpenAI".to_string(),
            base_url: Some("https://api.openai.com/v1".to_string()),
            model_name: Some("gpt-4o".to_string()),
            api_key: Some("sk-secret".to_string()),
            notes: None,
        })
        .expect("provider");
    let mut input = model_input("Parlay Builder");
    input.llm_provider_id = Some(provider.id.clone());
    input.settings = Some(json!({"temperature": 0.2}));
    let model = db.create_model(&input).expect("model");

    let (loaded, loaded_provider) = db
        .get_active_model_with_provider(&model.id)
        .expect("lookup")
        .expect("active model");

    assert_eq!(loaded.name, "Parlay Builder");
    assert_eq!(loaded.settings, Some(json!({"temperature": 0.2})));
    assert_eq!(loaded_provider.expect("provider").name, "OpenAI");
}

#[test]
fn inactive_model_is_unavailable() {
    let test_db = setup_db();
    let db = &test_db.db;
    let mut input = model_input("Retired");
    input.is_active = false;
    let model = db.create_model(&input).expect("model");

    assert!(
        db.get_active_model_with_provider(&model.id)
            .expect("lookup")
            .is_none()
    );
    assert!(db.list_models(true).expect("active").is_empty());
    assert_eq!(db.list_models(false).expect("all").len(), 1);
}

#[test]
fn update_provider_keeps_key_when_omitted() {
    let test_db = setup_db();
    let db = &test_db.db;
    let provider = db
        .create_provider(&LlmProviderInput {
            name: "Anthropic".to_string(),
            api_key: Some("key-1234".to_string()),
            ..LlmProviderInput::default()
        })
        .expect("provider");

    let updated = db
        .update_provider(
            &provider.id,
            &LlmProviderInput {
                name: "Anthropic EU".to_string(),
                ..LlmProviderInput::default()
            },
        )
        .expect("update")
        .expect("exists");

    assert_eq!(updated.name, "Anthropic EU");
    assert_eq!(updated.api_key.as_deref(), Some("key-1234"));
}

#[test]
fn deleting_provider_unlinks_models() {
    let test_db = setup_db();
    let db = &test_db.db;
    let provider = db
        .create_provider(&LlmProviderInput {
            name: "Local".to_string(),
            ..LlmProviderInput::default()
        })
        .expect("provider");
    let mut input = model_input("Linked");
    input.llm_provider_id = Some(provider.id.clone());
    let model = db.create_model(&input).expect("model");

    assert!(db.delete_provider(&provider.id).expect("delete"));

    let model = db.get_model(&model.id).expect("load").expect("model");
    assert_eq!(model.llm_provider_id, None);
}

#[test]
fn token_cost_upsert_replaces_existing_row() {
    let test_db = setup_db();
    let db = &test_db.db;
    let model = create_model(db, "Golf");

    let first = db
        .upsert_token_cost(&ModelTokenCostInput {
            model_id: model.id.clone(),
            tokens_required: 3,
            description: None,
        })
        .expect("insert");
    let second = db
        .upsert_token_cost(&ModelTokenCostInput {
            model_id: model.id.clone(),
            tokens_required: 7,
            description: Some("premium".to_string()),
        })
        .expect("update");

    assert_eq!(first.id, second.id);
    assert_eq!(second.tokens_required, 7);
    assert_eq!(second.model_name.as_deref(), Some("Golf"));
    let stored = db
        .get_token_cost_for_model(&model.id)
        .expect("cost")
        .expect("row");
    assert_eq!(stored.tokens_required, 7);
    assert_eq!(db.list_token_costs().expect("list").len(), 1);
}

#[test]
fn token_cost_must_be_positive() {
    let test_db = setup_db();
    let db = &test_db.db;
    let model = create_model(db, "Cricket");

    let result = db.upsert_token_cost(&ModelTokenCostInput {
        model_id: model.id,
        tokens_required: 0,
        description: None,
    });
    assert!(result.is_err());
}

#[test]
fn deleting_model_drops_its_cost() {
    let test_db = setup_db();
    let db = &test_db.db;
    let model = support::create_priced_model(db, "Boxing", 2);

    assert!(db.delete_model(&model.id).expect("delete"));
    assert!(
        db.get_token_cost_for_model(&model.id)
            .expect("cost")
            .is_none()
    );
}

#[test]
fn sports_sort_by_order_then_name() {
    let test_db = setup_db();
    let db = &test_db.db;
    for (name, order) in [("Tennis", None), ("Soccer", Some(2)), ("Basketball", Some(1))] {
        db.create_sport(&SportInput {
            name: name.to_string(),
            sport_order: order,
            is_active: true,
            ..SportInput::default()
        })
        .expect("sport");
    }

    let names: Vec<String> = db
        .list_sports()
        .expect("sports")
        .into_iter()
        .map(|sport| sport.name)
        .collect();
    assert_eq!(names, vec!["Basketball", "Soccer", "Tennis"]);
}

#[test]
fn bet_type_names_are_unique() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.create_bet_type("Moneyline").expect("create");

    let err = db.create_bet_type("Moneyline").unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(db.list_bet_types().expect("list").len(), 1);
}

#[test]
fn sport_and_bet_type_update_in_place() {
    let test_db = setup_db();
    let db = &test_db.db;
    let sport = db
        .create_sport(&SportInput {
            name: "Futbol".to_string(),
            ..SportInput::default()
        })
        .expect("sport");
    let updated = db
        .update_sport(
            &sport.id,
            &SportInput {
                name: "Soccer".to_string(),
                icon: Some("ball".to_string()),
                sport_order: Some(1),
                is_active: false,
                ..SportInput::default()
            },
        )
        .expect("update")
        .expect("exists");
    assert_eq!(updated.id, sport.id);
    assert_eq!(updated.name, "Soccer");
    assert!(!updated.is_active);
    assert!(
        db.update_sport("missing", &SportInput::default())
            .expect("update")
            .is_none()
    );

    let spread = db.create_bet_type("Spread").expect("create");
    db.create_bet_type("Total").expect("create");
    let renamed = db
        .update_bet_type(&spread.id, "Point Spread")
        .expect("rename")
        .expect("exists");
    assert_eq!(renamed.name, "Point Spread");

    let err = db.update_bet_type(&spread.id, "Total").unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn feeds_join_sport_name_and_keep_key_on_update() {
    let test_db = setup_db();
    let db = &test_db.db;
    let sport = db
        .create_sport(&SportInput {
            name: "Basketball".to_string(),
            ..SportInput::default()
        })
        .expect("sport");
    let feed = db
        .create_feed(&ApiFeedInput {
            name: "NBA odds".to_string(),
            url: "https://odds.example/nba".to_string(),
            api_key: Some("feed-key-0001".to_string()),
            sport_id: Some(sport.id.clone()),
            ..ApiFeedInput::default()
        })
        .expect("feed");
    assert_eq!(feed.sport_name.as_deref(), Some("Basketball"));
    assert_eq!(feed.refresh_interval, 300);
    assert!(feed.last_fetch.is_none());

    let updated = db
        .update_feed(
            &feed.id,
            &ApiFeedInput {
                name: "NBA odds v2".to_string(),
                url: "https://odds.example/v2/nba".to_string(),
                refresh_interval: 60,
                ..ApiFeedInput::default()
            },
        )
        .expect("update")
        .expect("exists");
    assert_eq!(updated.api_key, "feed-key-0001");
    assert_eq!(updated.refresh_interval, 60);
    assert_eq!(updated.sport_id, None);

    assert!(db.delete_feed(&feed.id).expect("delete"));
    assert!(db.list_feeds().expect("list").is_empty());
}

#[test]
fn deleting_sport_unlinks_feeds() {
    let test_db = setup_db();
    let db = &test_db.db;
    let sport = db
        .create_sport(&SportInput {
            name: "Golf".to_string(),
            ..SportInput::default()
        })
        .expect("sport");
    let feed = db
        .create_feed(&ApiFeedInput {
            name: "PGA".to_string(),
            url: "https://golf.example".to_string(),
            api_key: Some("k".to_string()),
            sport_id: Some(sport.id.clone()),
            ..ApiFeedInput::default()
        })
        .expect("feed");

    assert!(db.delete_sport(&sport.id).expect("delete"));
    let feed = db.get_feed(&feed.id).expect("load").expect("feed");
    assert_eq!(feed.sport_id, None);
    assert_eq!(feed.sport_name, None);
}
