use axum::response::Html;

/// Static marketing view. No parameters, no business logic.
const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Home | Newsstand</title>
  <style>
    body { background: #121214; color: #e1e1e6; font-family: sans-serif; margin: 0; }
    main { max-width: 1120px; margin: 0 auto; padding: 0 2rem; display: flex; align-items: center; justify-content: space-between; min-height: 100vh; }
    .hero span { font-size: 1.5rem; font-weight: bold; }
    .hero h1 { font-size: 4.5rem; line-height: 4.5rem; margin-top: 2.5rem; }
    .hero h1 em { color: #eba417; font-style: normal; }
    .hero p { font-size: 1.5rem; line-height: 2.25rem; margin-top: 1.5rem; }
    .hero p em { color: #61dafb; font-style: normal; font-weight: bold; }
  </style>
</head>
<body>
  <main>
    <section class="hero">
      <span>&#128079; Hey, welcome</span>
      <h1>News about the <em>tech</em> world</h1>
      <p>Get access to all the publications<br><em>for $9.90 month</em></p>
    </section>
    <img src="/images/avatar.svg" alt="Girl coding">
  </main>
</body>
</html>
"#;

/// GET / - Render the landing page
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
