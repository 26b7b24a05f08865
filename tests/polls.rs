mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use chrono::{Duration, Utc};
use common::setup;
use futures_util::future::join_all;
use polls::core::ports::repository::Manager;
use polls::core::services::question::question_with_choices;
use polls::server::build_app;
use rstest::rstest;

async fn body_text(res: actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> String {
    String::from_utf8(test::read_body(res).await.to_vec()).unwrap()
}

#[actix_web::test]
async fn empty_index_says_no_polls() {
    let app = setup().await;
    let service = test::init_service(build_app(app.state.clone())).await;
    let res = test::call_service(&service, test::TestRequest::get().uri("/polls/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("No polls are available."));
}

#[actix_web::test]
async fn index_lists_five_latest_published_questions() {
    let app = setup().await;
    for i in 1..=7 {
        app.question(&format!("Past question {}", i), Duration::hours(i * 2), &[]).await;
    }
    app.question("Future question", -Duration::days(30), &[]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let res = test::call_service(&service, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(!body.contains("Future question"));
    assert!(!body.contains("Past question 6"));
    assert!(!body.contains("Past question 7"));
    let positions: Vec<usize> = (1..=5).map(|i| body.find(&format!("Past question {}<", i)).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "newest first: {:?}", positions);
}

#[actix_web::test]
async fn detail_shows_choices_and_vote_form() {
    let app = setup().await;
    let (id, choices) = app.question("Which framework?", Duration::hours(1), &["Django", "Flask"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let res = test::call_service(&service, test::TestRequest::get().uri(&format!("/polls/{}/", id)).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Which framework?"));
    assert!(body.contains(&format!("action=\"/polls/{}/vote/\"", id)));
    assert!(body.contains(&format!("value=\"{}\"", choices[0])));
    assert!(body.contains("Flask"));
}

#[actix_web::test]
async fn missing_trailing_slash_is_appended() {
    let app = setup().await;
    let (id, _) = app.question("Which framework?", Duration::hours(1), &["Django"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;
    let res = test::call_service(&service, test::TestRequest::get().uri(&format!("/polls/{}", id)).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("/polls/999/")]
#[case("/polls/999/results/")]
#[case("/polls/abc/")]
#[case("/no/such/page/")]
#[actix_web::test]
async fn unknown_pages_are_404(#[case] uri: &str) {
    let app = setup().await;
    let service = test::init_service(build_app(app.state.clone())).await;
    let res = test::call_service(&service, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn vote_on_unknown_question_is_404() {
    let app = setup().await;
    let service = test::init_service(build_app(app.state.clone())).await;
    let req = test::TestRequest::post().uri("/polls/999/vote/").set_form([("choice", "1")]).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::no_body(None)]
#[case::empty_choice(Some(""))]
#[case::not_a_number(Some("django"))]
#[actix_web::test]
async fn vote_without_valid_choice_redisplays_form(#[case] choice: Option<&str>) {
    let app = setup().await;
    let (id, _) = app.question("Which framework?", Duration::hours(1), &["Django", "Flask"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let mut req = test::TestRequest::post().uri(&format!("/polls/{}/vote/", id));
    if let Some(choice) = choice {
        req = req.set_form([("choice", choice)]);
    }
    let res = test::call_service(&service, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("You didn&#x27;t select a choice."));
    assert!(body.contains("Which framework?"));
    assert_eq!(app.votes(id).await, vec![0, 0]);
}

#[actix_web::test]
async fn vote_for_another_questions_choice_changes_nothing() {
    let app = setup().await;
    let (id, _) = app.question("Which framework?", Duration::hours(1), &["Django", "Flask"]).await;
    let (other_id, other_choices) = app.question("Which editor?", Duration::hours(1), &["Vim"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/polls/{}/vote/", id))
        .set_form([("choice", other_choices[0].to_string())])
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("select a choice."));
    assert_eq!(app.votes(id).await, vec![0, 0]);
    assert_eq!(app.votes(other_id).await, vec![0]);
}

#[actix_web::test]
async fn voting_increments_one_choice_and_shows_results() {
    let app = setup().await;
    let (id, choices) = app.question("Which framework?", Duration::hours(1), &["Django", "Flask"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/polls/{}/vote/", id))
        .set_form([("choice", choices[0].to_string())])
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_owned();
    assert_eq!(location, format!("/polls/{}/results/", id));
    assert_eq!(app.votes(id).await, vec![1, 0]);

    let res = test::call_service(&service, test::TestRequest::get().uri(&location).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Django -- 1 vote<"));
    assert!(body.contains("Flask -- 0 votes"));
    assert!(body.contains("Vote again?"));
}

#[actix_web::test]
async fn concurrent_votes_are_all_counted() {
    let app = setup().await;
    let (id, choices) = app.question("Which framework?", Duration::hours(1), &["Django", "Flask"]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let requests = (0..20).map(|_| {
        let req = test::TestRequest::post()
            .uri(&format!("/polls/{}/vote/", id))
            .set_form([("choice", choices[1].to_string())])
            .to_request();
        test::call_service(&service, req)
    });
    let responses = join_all(requests).await;
    assert!(responses.iter().all(|r| r.status() == StatusCode::FOUND));
    assert_eq!(app.votes(id).await, vec![0, 20]);
}

#[actix_web::test]
async fn hello_greets_by_name() {
    let app = setup().await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let res = test::call_service(&service, test::TestRequest::get().uri("/hello/").to_request()).await;
    assert!(body_text(res).await.contains("Hello, world!"));

    let res = test::call_service(&service, test::TestRequest::get().uri("/hello/?name=Rustacean").to_request()).await;
    let body = body_text(res).await;
    assert!(body.contains("Hello, Rustacean!"));
    assert!(body.contains("<html lang=\"en-us\">"));
}

#[actix_web::test]
async fn disallowed_host_is_rejected() {
    let app = common::setup_with(|settings| settings.allowed_hosts = vec!["polls.test".into()]).await;
    let service = test::init_service(build_app(app.state.clone())).await;

    let req = test::TestRequest::get().uri("/polls/").insert_header((header::HOST, "polls.test")).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/polls/").insert_header((header::HOST, "evil.test")).to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn recently_published_flag_follows_pub_date() {
    let app = setup().await;
    let now = Utc::now();
    let (fresh, _) = app.question_at("Fresh", now - Duration::hours(23), &[]).await;
    let (stale, _) = app.question_at("Stale", now - Duration::days(2), &[]).await;
    let mut storer = app.manager().db().await.unwrap();
    let fresh = question_with_choices(&mut storer, fresh).await.unwrap();
    let stale = question_with_choices(&mut storer, stale).await.unwrap();
    assert!(fresh.question.was_published_recently());
    assert!(!stale.question.was_published_recently());
}
