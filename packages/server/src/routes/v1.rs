use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{
    auth, evaluate, execute, health, hr_report, interview, problem, scratch, submission, user,
};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/problems", problem_routes())
        .nest("/execute", execute_routes())
        .nest("/submissions", submission_routes())
        .nest("/interviews", interview_routes())
        .nest("/evaluate", OpenApiRouter::new().routes(routes!(evaluate::evaluate)))
        .nest("/hr-reports", hr_report_routes())
        .nest("/scratch", scratch_routes())
        .nest("/health", OpenApiRouter::new().routes(routes!(health::health)))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(user::get_me, user::update_me))
}

fn problem_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(problem::list_problems, problem::create_problem))
        .routes(routes!(
            problem::get_problem,
            problem::update_problem,
            problem::delete_problem
        ))
        .nest("/{id}/test-cases", test_case_routes())
        .nest(
            "/{id}/submissions",
            OpenApiRouter::new().routes(routes!(
                submission::list_my_submissions,
                submission::create_submission
            )),
        )
}

fn test_case_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(problem::list_test_cases, problem::create_test_case))
        .routes(routes!(problem::update_test_case, problem::delete_test_case))
}

fn execute_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(execute::execute))
        .routes(routes!(execute::run))
        .routes(routes!(execute::list_languages))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(submission::get_submission))
}

fn interview_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(interview::list_interviews, interview::create_interview))
        .routes(routes!(interview::get_interview))
        .routes(routes!(interview::submit_answer))
        .routes(routes!(interview::finalize_interview))
        .routes(routes!(interview::get_interview_report))
        .routes(routes!(interview::list_interview_jobs))
}

fn hr_report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(hr_report::list_hr_reports, hr_report::create_hr_report))
        .routes(routes!(hr_report::get_hr_report))
}

fn scratch_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(scratch::append_entry))
        .routes(routes!(scratch::get_report, scratch::put_report))
}
