pub mod auth;
pub mod bids;
pub mod chat;
pub mod orders;
pub mod payments;
pub mod projects;
pub mod services;
pub mod users;

use actix_web::web;

use crate::chat::session;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User routes (all protected — require valid JWT) ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );

    // ── Project routes ──
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::list_projects))
            .route("", web::post().to(projects::create_project))
            .route("/my", web::get().to(projects::my_projects))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::delete().to(projects::delete_project))
            .route("/{id}/bids", web::get().to(projects::get_project_bids))
            .route("/{id}/cancel", web::post().to(projects::cancel_project))
            .route("/{id}/resume", web::post().to(projects::resume_project))
            .route("/{id}/complete", web::post().to(projects::complete_project))
            .route(
                "/{project_id}/bids/{bid_id}/accept",
                web::post().to(projects::accept_bid),
            ),
    );

    // ── Bid routes ──
    cfg.service(
        web::scope("/bids")
            .route("", web::post().to(bids::create_bid))
            .route("/my", web::get().to(bids::my_bids))
            .route("/{id}", web::get().to(bids::get_bid))
            .route("/{id}", web::put().to(bids::update_bid))
            .route("/{id}", web::delete().to(bids::withdraw_bid))
            .route("/{id}/reject", web::post().to(bids::reject_bid)),
    );

    // ── Service routes ──
    cfg.service(
        web::scope("/services")
            .route("", web::get().to(services::list_services))
            .route("", web::post().to(services::create_service))
            .route("/my", web::get().to(services::my_services))
            .route("/{id}", web::get().to(services::get_service))
            .route("/{id}", web::put().to(services::update_service))
            .route("/{id}", web::delete().to(services::delete_service))
            .route("/{id}/orders", web::get().to(services::get_service_orders))
            .route("/{id}/cancel", web::post().to(services::cancel_service))
            .route("/{id}/resume", web::post().to(services::resume_service))
            .route(
                "/{service_id}/orders/{order_id}/accept",
                web::post().to(services::accept_order),
            ),
    );

    // ── Order routes ──
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("/my", web::get().to(orders::my_orders))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::put().to(orders::update_order))
            .route("/{id}", web::delete().to(orders::withdraw_order))
            .route("/{id}/reject", web::post().to(orders::reject_order))
            .route("/{id}/complete", web::post().to(orders::complete_order)),
    );

    // ── Payment routes (success/cancel are reachable without a session:
    //    the provider redirects the payer there) ──
    cfg.service(
        web::scope("/payments")
            .route("/checkout", web::post().to(payments::start_checkout))
            .route("/success", web::get().to(payments::success_callback))
            .route("/cancel", web::get().to(payments::cancel_navigation))
            .route("/my", web::get().to(payments::my_payments)),
    );

    // ── Chat routes ──
    cfg.service(
        web::scope("/chat")
            .route("/ws/{chat_id}", web::get().to(session::ws_connect))
            .route("/conversations", web::get().to(chat::get_conversations))
            .route("/{chat_id}/messages", web::get().to(chat::get_messages))
            .route("/{chat_id}/read", web::put().to(chat::mark_chat_read))
            .route(
                "/messages/{id}/read",
                web::put().to(chat::mark_message_read),
            ),
    );
}
