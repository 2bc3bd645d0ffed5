use crate::utils::webutils::validate_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub mod auth;
pub mod candidates;
pub mod companies;
pub mod contacts;
pub mod health;
pub mod invitations;
pub mod search;
pub mod team;
pub mod todos;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let user_auth = HttpAuthentication::bearer(validate_token);

    cfg.service(web::scope("/health").service(health::health));
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    );
    cfg.service(
        web::scope("/api")
            .wrap(user_auth)
            .service(
                web::scope("/companies")
                    .service(companies::list)
                    .service(companies::get)
                    .service(companies::create)
                    .service(companies::update)
                    .service(companies::delete),
            )
            .service(
                web::scope("/contacts")
                    .service(contacts::list)
                    .service(contacts::get)
                    .service(contacts::create)
                    .service(contacts::update)
                    .service(contacts::delete)
                    .service(contacts::create_note)
                    .service(contacts::update_note)
                    .service(contacts::delete_note),
            )
            .service(
                web::scope("/todos")
                    .service(todos::list)
                    .service(todos::get)
                    .service(todos::create)
                    .service(todos::update)
                    .service(todos::delete),
            )
            .service(
                web::scope("/candidates")
                    .service(candidates::list)
                    .service(candidates::get)
                    .service(candidates::create)
                    .service(candidates::update)
                    .service(candidates::delete)
                    .service(candidates::create_comment)
                    .service(candidates::update_comment)
                    .service(candidates::delete_comment),
            )
            .service(
                web::scope("/team")
                    .service(team::view)
                    .service(team::members)
                    .service(team::invite)
                    .service(team::cancel_invite)
                    .service(team::transfer)
                    .service(team::leave)
                    .service(team::remove_member),
            )
            .service(
                web::scope("/invitations")
                    .service(invitations::list)
                    .service(invitations::accept)
                    .service(invitations::decline),
            )
            .service(web::scope("/search").service(search::search)),
    );
}
