use crate::core::ports::repository::Manager;
use crate::handlers::{admin, hello, polls};
use actix_web::web::{get, post, resource, scope, ServiceConfig};

/// Public pages: the poll index, detail, results and vote, plus the greeting.
pub fn public<M: Manager + 'static>(cfg: &mut ServiceConfig) {
    cfg.service(resource("/").route(get().to(polls::index::<M>)))
        .service(
            scope("/polls")
                .service(resource("/").route(get().to(polls::index::<M>)))
                .service(resource("/{question_id}/").route(get().to(polls::detail::<M>)))
                .service(resource("/{question_id}/results/").route(get().to(polls::results::<M>)))
                .service(resource("/{question_id}/vote/").route(post().to(polls::vote::<M>))),
        )
        .service(resource("/hello/").route(get().to(hello::hello)));
}

/// The admin site, mounted under `/admin/`.
pub fn admin_site<M: Manager + 'static>(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/admin")
            .service(resource("/").route(get().to(admin::index)))
            .service(
                scope("/polls/question")
                    .service(resource("/").route(get().to(admin::changelist::<M>)))
                    .service(resource("/add/").route(get().to(admin::add_form)).route(post().to(admin::add::<M>)))
                    .service(
                        resource("/{question_id}/change/")
                            .route(get().to(admin::change_form::<M>))
                            .route(post().to(admin::change::<M>)),
                    )
                    .service(
                        resource("/{question_id}/delete/")
                            .route(get().to(admin::delete_confirmation::<M>))
                            .route(post().to(admin::delete::<M>)),
                    ),
            ),
    );
}
