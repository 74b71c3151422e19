use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::JwtSettings;
use crate::logger::LoggerMiddleware;
use crate::middleware::JwtMiddleware;
use crate::routes::{
    create_task, delete_task, get_task, health_check, list_tasks, login, logout, me, refresh,
    register, update_task,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_settings: JwtSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_data = web::Data::new(jwt_settings.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_data.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh", web::post().to(refresh))
            .route("/auth/logout", web::post().to(logout))
            // Protected routes (bearer token required)
            .service(
                web::scope("/auth")
                    .wrap(JwtMiddleware::new(jwt_settings.clone()))
                    .route("/me", web::get().to(me)),
            )
            .service(
                web::scope("/task")
                    .wrap(JwtMiddleware::new(jwt_settings.clone()))
                    .route("", web::get().to(list_tasks))
                    .route("", web::post().to(create_task))
                    .route("/{id}", web::get().to(get_task))
                    .route("/{id}", web::put().to(update_task))
                    .route("/{id}", web::delete().to(delete_task)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
