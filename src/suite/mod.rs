//! # Built-in Suite
//!
//! The stock chains the binary runs: CRUD coverage for a json-server-auth
//! style posts API, mixing positive-path checks with deliberate negative
//! paths (missing token, missing resource id). Every inter-step dependency
//! is an explicit context key; nothing is carried through shared fixtures.

use serde_json::json;

use crate::assertions::{Assertion, Expected};
use crate::chain::{Chain, Step};
use crate::fixtures::FixtureProvider;
use crate::http::method::HttpMethod;
use crate::http::request::RequestSpec;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Build the full suite. Fixture values are drawn once per chain definition,
/// so each run of `default_suite` produces non-colliding payloads.
pub fn default_suite(fixtures: &dyn FixtureProvider) -> Vec<Chain> {
    vec![
        list_all_posts(),
        list_first_page(),
        posts_by_id(),
        create_without_token(fixtures),
        create_with_token(fixtures),
        create_with_raw_json(fixtures),
        update_missing_post(fixtures),
        create_then_update(fixtures),
        delete_missing_post(),
        post_lifecycle(fixtures),
    ]
}

fn list_all_posts() -> Chain {
    Chain::new("list all posts").step(
        Step::new("get posts", RequestSpec::new(HttpMethod::Get, "/posts"))
            .expect_status(200)
            .expect_header("content-type", JSON_UTF8),
    )
}

fn list_first_page() -> Chain {
    Chain::new("list first 10 posts").step(
        Step::new(
            "get first page",
            RequestSpec::new(HttpMethod::Get, "/posts?_page=1&_limit=10"),
        )
        .expect_status(200)
        .assert(Assertion::BodyLengthEquals(10)),
    )
}

fn posts_by_id() -> Chain {
    let mut chain = Chain::new("get posts by id");
    for id in [55, 60] {
        chain = chain.step(
            Step::new(
                format!("get post {id}"),
                RequestSpec::new(HttpMethod::Get, format!("/posts/{id}")),
            )
            .expect_status(200)
            .expect_body_field("id", Expected::literal(id)),
        );
    }
    chain
}

fn create_without_token(fixtures: &dyn FixtureProvider) -> Chain {
    let payload = json!({
        "title": fixtures.sentence(),
        "body": fixtures.paragraph(),
    });

    Chain::new("create post without token").step(
        Step::new(
            "unauthorized create",
            RequestSpec::new(HttpMethod::Post, "/664/posts")
                .header("Content-Type", "application/json")
                .json_body(payload)
                .tolerate_error_status(),
        )
        .expect_status(401),
    )
}

fn create_with_token(fixtures: &dyn FixtureProvider) -> Chain {
    let credentials = fixtures.credentials();
    let title = fixtures.sentence();
    let payload = json!({
        "title": title.clone(),
        "body": fixtures.paragraph(),
    });

    Chain::new("create post with access token")
        .step(
            Step::new(
                "register user",
                RequestSpec::new(HttpMethod::Post, "/register").json_body(json!({
                    "email": credentials.email,
                    "password": credentials.password,
                })),
            )
            .expect_status(201)
            .extract_body("token", "accessToken"),
        )
        .step(
            Step::new(
                "authorized create",
                RequestSpec::new(HttpMethod::Post, "/664/posts")
                    .header("Authorization", "Bearer {{token}}")
                    .header("Content-Type", "application/json")
                    .json_body(payload),
            )
            .expect_status(201)
            .expect_body_field("title", Expected::literal(title.clone()))
            .extract_body("postId", "id"),
        )
        .step(
            Step::new(
                "read created post",
                RequestSpec::new(HttpMethod::Get, "/664/posts/{{postId}}"),
            )
            .expect_status(200)
            .expect_body_field("id", Expected::from_context("postId"))
            .expect_body_field("title", Expected::literal(title)),
        )
}

fn create_with_raw_json(fixtures: &dyn FixtureProvider) -> Chain {
    let payload = json!({
        "title": fixtures.sentence(),
        "body": fixtures.paragraph(),
    });

    Chain::new("create post from raw json").step(
        Step::new(
            "create",
            RequestSpec::new(HttpMethod::Post, "/posts")
                .header("Content-Type", "application/json")
                .raw_body(payload.to_string()),
        )
        .expect_status(201)
        .assert(Assertion::BodyContains(payload)),
    )
}

fn update_missing_post(fixtures: &dyn FixtureProvider) -> Chain {
    let payload = json!({
        "title": fixtures.sentence(),
        "body": fixtures.paragraph(),
    });

    Chain::new("update non-existing post").step(
        Step::new(
            "update without id",
            RequestSpec::new(HttpMethod::Put, "/posts")
                .header("Content-Type", "application/json")
                .json_body(payload)
                .tolerate_error_status(),
        )
        .expect_status(404),
    )
}

fn create_then_update(fixtures: &dyn FixtureProvider) -> Chain {
    let title = fixtures.sentence();
    let original_body = fixtures.paragraph();
    let updated_body = fixtures.paragraph();

    Chain::new("create and update post")
        .step(
            Step::new(
                "create",
                RequestSpec::new(HttpMethod::Post, "/posts").json_body(json!({
                    "title": title.clone(),
                    "body": original_body.clone(),
                })),
            )
            .expect_status(201)
            .expect_body_field("title", Expected::literal(title.clone()))
            .expect_body_field("body", Expected::literal(original_body))
            .extract_body("postId", "id")
            .extract_body("prevBody", "body"),
        )
        .step(
            Step::new(
                "update",
                RequestSpec::new(HttpMethod::Put, "/posts/{{postId}}").json_body(json!({
                    "title": title,
                    "body": updated_body.clone(),
                })),
            )
            .expect_status(200)
            .expect_body_field("body", Expected::literal(updated_body))
            .expect_body_field_differs("body", Expected::from_context("prevBody")),
        )
}

fn delete_missing_post() -> Chain {
    Chain::new("delete non-existing post").step(
        Step::new(
            "delete without id",
            RequestSpec::new(HttpMethod::Delete, "/posts").tolerate_error_status(),
        )
        .expect_status(404),
    )
}

fn post_lifecycle(fixtures: &dyn FixtureProvider) -> Chain {
    let title = fixtures.sentence();
    let original_body = fixtures.paragraph();
    let updated_body = fixtures.paragraph();

    Chain::new("post lifecycle")
        .step(
            Step::new(
                "create",
                RequestSpec::new(HttpMethod::Post, "/posts").json_body(json!({
                    "title": title.clone(),
                    "body": original_body,
                })),
            )
            .expect_status(201)
            .expect_body_field("title", Expected::literal(title.clone()))
            .extract_body("postId", "id")
            .extract_body("prevBody", "body"),
        )
        .step(
            Step::new(
                "update",
                RequestSpec::new(HttpMethod::Put, "/posts/{{postId}}").json_body(json!({
                    "title": title,
                    "body": updated_body.clone(),
                })),
            )
            .expect_status(200)
            .expect_body_field("body", Expected::literal(updated_body))
            .expect_body_field_differs("body", Expected::from_context("prevBody")),
        )
        .step(
            Step::new(
                "delete",
                RequestSpec::new(HttpMethod::Delete, "/posts/{{postId}}"),
            )
            .expect_status(200),
        )
        .step(
            Step::new(
                "read deleted",
                RequestSpec::new(HttpMethod::Get, "/posts/{{postId}}")
                    .header("Content-Type", JSON_UTF8)
                    .tolerate_error_status(),
            )
            .expect_status(404),
        )
}

#[cfg(test)]
mod tests {
    use crate::fixtures::faker::FakerFixtures;

    use super::*;

    #[test]
    fn suite_has_ten_chains() {
        let chains = default_suite(&FakerFixtures);
        assert_eq!(chains.len(), 10);
    }

    #[test]
    fn every_step_declares_assertions() {
        for chain in default_suite(&FakerFixtures) {
            assert!(!chain.steps.is_empty(), "chain `{}` is empty", chain.name);
            for step in &chain.steps {
                assert!(
                    !step.assertions.is_empty(),
                    "step `{}` of `{}` has no assertions",
                    step.name,
                    chain.name
                );
            }
        }
    }

    #[test]
    fn dependent_steps_reference_extracted_keys() {
        let chains = default_suite(&FakerFixtures);
        let lifecycle = chains
            .iter()
            .find(|chain| chain.name == "post lifecycle")
            .unwrap();
        assert!(lifecycle.steps[1].spec.path.contains("{{postId}}"));
        assert!(lifecycle.steps[2].spec.path.contains("{{postId}}"));
        assert!(lifecycle.steps[3].spec.tolerate_error_status);
    }

    #[test]
    fn auth_chain_threads_the_token_through_headers() {
        let chains = default_suite(&FakerFixtures);
        let auth = chains
            .iter()
            .find(|chain| chain.name == "create post with access token")
            .unwrap();
        let create = &auth.steps[1];
        assert_eq!(
            create.spec.headers.get("Authorization").unwrap(),
            "Bearer {{token}}"
        );
    }

    #[test]
    fn suites_use_fresh_fixture_payloads() {
        let first = default_suite(&FakerFixtures);
        let second = default_suite(&FakerFixtures);
        let pick = |chains: &[Chain]| {
            chains
                .iter()
                .find(|chain| chain.name == "create and update post")
                .unwrap()
                .steps[0]
                .spec
                .body
                .clone()
        };
        assert_ne!(pick(&first), pick(&second));
    }
}
