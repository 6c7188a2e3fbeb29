use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use reqwest::{redirect, Client};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::time::sleep;

const STUB_TOKEN: &str = "test-token";

/// Switchable state for the stub upstream API: whether the issued token is
/// still accepted, and how many attendance fetches the panel has made.
#[derive(Clone)]
struct StubState {
    token_valid: Arc<AtomicBool>,
    attendance_hits: Arc<AtomicUsize>,
}

struct TestHarness {
    panel_url: String,
    stub: StubState,
    child: Child,
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static HARNESS: Lazy<Mutex<Option<Arc<TestHarness>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_session_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "fitness_panel_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

fn authorized(headers: &HeaderMap, stub: &StubState) -> bool {
    let expected = format!("Bearer {STUB_TOKEN}");
    stub.token_valid.load(Ordering::SeqCst)
        && headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value == expected)
            .unwrap_or(false)
}

fn upstream_router(stub: StubState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/login/",
            post(|Json(body): Json<Value>| async move {
                let username = body["username"].as_str().unwrap_or_default();
                let password = body["password"].as_str().unwrap_or_default();
                if username == "admin" && password == "secret" {
                    Json(json!({
                        "access_token": STUB_TOKEN,
                        "usuario": "admin",
                        "roles": ["ADMIN"],
                    }))
                    .into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        )
        .route(
            "/asistencias",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                stub.attendance_hits.fetch_add(1, Ordering::SeqCst);
                Json(json!([
                    {
                        "monitor_nombre": "Laura Gomez",
                        "comuna_actividad": "5",
                        "parque": "Parque del Rio",
                        "barrio_actividad": "Centro",
                        "tipo_actividad": "Aerobics",
                        "fecha_asistencia": "2025-01-10"
                    },
                    {
                        "monitor_nombre": "Laura Gomez",
                        "comuna_actividad": "5",
                        "parque": "Parque del Rio",
                        "barrio_actividad": "Centro",
                        "tipo_actividad": "Yoga",
                        "fecha_asistencia": "2025-01-11"
                    },
                    {
                        "monitor_nombre": "Carlos Ruiz",
                        "comuna_actividad": "San Cristobal",
                        "parque": "Cancha Veredal",
                        "barrio_actividad": "La Loma",
                        "tipo_actividad": "Football",
                        "fecha_asistencia": "2025-01-15"
                    }
                ]))
                .into_response()
            }),
        )
        .route(
            "/usuarios/count",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({ "total_usuarios": 2421 })).into_response()
            }),
        )
        .route(
            "/asistencias/por-genero",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({ "hombres": 60, "mujeres": 40 })).into_response()
            }),
        )
        .route(
            "/monitores/basico",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({
                    "monitores": [
                        {
                            "user_id": "m1",
                            "first_name": "Laura Gomez",
                            "document_number": "12345678"
                        }
                    ],
                    "total": 1
                }))
                .into_response()
            }),
        )
        .route(
            "/monitores/estadisticas-actividades/:id",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({ "total_actividades": 12, "total_asistentes": 180 })).into_response()
            }),
        )
        .route(
            "/monitores/actividades-canceladas/:id",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                // This section is down: the panel must degrade, not fail.
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }),
        )
        .route(
            "/monitores/calificaciones-promedio/:id",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({ "calificacion_promedio": 4.5 })).into_response()
            }),
        )
        .route(
            "/caracterizacion-por-zona",
            get(|State(stub): State<StubState>, headers: HeaderMap| async move {
                if !authorized(&headers, &stub) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({
                    "caracterizacion_por_zona": [
                        {
                            "zona": "urbana",
                            "nombre_zona_agrupacion": "Comuna 5",
                            "promedio_peso": 70.2,
                            "promedio_estatura": 1.68,
                            "promedio_imc": 24.6,
                            "promedio_icc": 0.84,
                            "promedio_grasa_corporal": 22.3,
                            "total_registros_en_zona": 37
                        },
                        {
                            "zona": "rural",
                            "nombre_zona_agrupacion": "San Cristobal",
                            "promedio_peso": 72.9,
                            "promedio_estatura": 1.65,
                            "promedio_imc": 26.1,
                            "promedio_icc": 0.88,
                            "promedio_grasa_corporal": 24.8,
                            "total_registros_en_zona": 18
                        }
                    ],
                    "total": 2
                }))
                .into_response()
            }),
        )
        .with_state(stub)
}

fn spawn_upstream(stub: StubState) -> String {
    let port = pick_free_port();
    let addr = format!("127.0.0.1:{port}");
    let bind_addr = addr.clone();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("upstream runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .expect("bind upstream stub");
            axum::serve(listener, upstream_router(stub))
                .await
                .expect("serve upstream stub");
        });
    });
    format!("http://{addr}")
}

fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("build client")
}

async fn wait_until_ready(base_url: &str) {
    let http = client();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = http.get(format!("{base_url}/")).send().await {
            if resp.status().is_success() || resp.status().is_redirection() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_harness() -> TestHarness {
    let stub = StubState {
        token_valid: Arc::new(AtomicBool::new(true)),
        attendance_hits: Arc::new(AtomicUsize::new(0)),
    };
    let upstream_url = spawn_upstream(stub.clone());
    wait_until_ready(&upstream_url).await;

    let port = pick_free_port();
    let session_path = unique_session_path();
    let child = Command::new(env!("CARGO_BIN_EXE_fitness_panel"))
        .env("PORT", port.to_string())
        .env("API_URL", &upstream_url)
        .env("EXCEL_URL", "http://127.0.0.1:9/exports")
        .env("SESSION_PATH", &session_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn panel");

    #[cfg(unix)]
    cleanup::register(child.id());

    let panel_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&panel_url).await;

    TestHarness {
        panel_url,
        stub,
        child,
    }
}

async fn shared_harness() -> Arc<TestHarness> {
    let mut guard = HARNESS.lock().await;
    if let Some(harness) = guard.as_ref() {
        return Arc::clone(harness);
    }
    let harness = Arc::new(spawn_harness().await);
    *guard = Some(Arc::clone(&harness));
    harness
}

async fn sign_out(harness: &TestHarness) {
    let response = client()
        .post(format!("{}/logout", harness.panel_url))
        .send()
        .await
        .expect("logout request");
    assert!(response.status().is_redirection());
}

async fn sign_in(harness: &TestHarness) {
    let response = client()
        .post(format!("{}/login", harness.panel_url))
        .form(&[("username", "admin"), ("password", "secret")])
        .send()
        .await
        .expect("login request");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/home");
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn unauthenticated_home_redirects_without_fetching() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_out(&harness).await;

    let hits_before = harness.stub.attendance_hits.load(Ordering::SeqCst);
    let response = client()
        .get(format!("{}/home", harness.panel_url))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
    assert_eq!(
        harness.stub.attendance_hits.load(Ordering::SeqCst),
        hits_before
    );
}

#[tokio::test]
async fn login_failure_shows_inline_error() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_out(&harness).await;

    let response = client()
        .post(format!("{}/login", harness.panel_url))
        .form(&[("username", "admin"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid username or password."));

    let home = client()
        .get(format!("{}/home", harness.panel_url))
        .send()
        .await
        .unwrap();
    assert!(home.status().is_redirection());
}

#[tokio::test]
async fn dashboard_renders_attendance_and_user_count() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    let response = client()
        .get(format!("{}/home", harness.panel_url))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Parque del Rio"));
    assert!(body.contains("Cancha Veredal"));
    assert!(body.contains("2421"));
}

#[tokio::test]
async fn stats_endpoint_honors_zone_filter() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    let urban: Value = client()
        .get(format!(
            "{}/api/attendance/stats?zone=urban",
            harness.panel_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(urban["administrative_areas"], json!(["5"]));
    assert_eq!(urban["total_filtered"], json!(2));
    assert_eq!(urban["distinct_venues"], json!(1));

    let rural: Value = client()
        .get(format!(
            "{}/api/attendance/stats?zone=rural",
            harness.panel_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rural["administrative_areas"], json!(["San Cristobal"]));
    assert_eq!(rural["total_filtered"], json!(1));
}

#[tokio::test]
async fn gender_endpoint_returns_percentages() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    let split: Value = client()
        .get(format!(
            "{}/api/attendance/gender?from=2025-01-01&to=2025-02-01",
            harness.panel_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(split["men"], json!(60));
    assert_eq!(split["women"], json!(40));
    assert_eq!(split["men_pct"], json!(60.0));
    assert_eq!(split["women_pct"], json!(40.0));
}

#[tokio::test]
async fn upstream_unauthorized_clears_session_and_redirects() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    harness.stub.token_valid.store(false, Ordering::SeqCst);
    let response = client()
        .get(format!("{}/home", harness.panel_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    // The stored session is gone: even with a healthy upstream, the panel
    // asks for a fresh sign-in instead of reusing the old token.
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    let after = client()
        .get(format!("{}/home", harness.panel_url))
        .send()
        .await
        .unwrap();
    assert!(after.status().is_redirection());
    assert_eq!(location(&after), "/");
}

#[tokio::test]
async fn monitor_summary_degrades_on_partial_failure() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    let summary: Value = client()
        .get(format!("{}/api/monitors/m1/summary", harness.panel_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["activity_stats"]["total_actividades"], json!(12));
    assert_eq!(summary["cancelled"], Value::Null);
    assert_eq!(summary["rating"]["calificacion_promedio"], json!(4.5));
}

#[tokio::test]
async fn characterization_page_renders_zone_rows() {
    let _guard = TEST_LOCK.lock().await;
    let harness = shared_harness().await;
    harness.stub.token_valid.store(true, Ordering::SeqCst);
    sign_in(&harness).await;

    let response = client()
        .get(format!(
            "{}/characterization?zone=urbana",
            harness.panel_url
        ))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Comuna 5"));
    assert!(!body.contains("San Cristobal"));
}
