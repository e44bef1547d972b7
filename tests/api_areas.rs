//! Integration tests for the area code endpoints
//!
//! - GET /api/areas
//! - GET /api/areas/{id}
//! - POST /api/areas
//! - PATCH /api/areas/{id}
//! - DELETE /api/areas/{id}

mod common;

#[cfg(test)]
mod area_tests {
    use super::common::*;
    use contatos_regionais::core::error::messages;
    use serde_json::{Value, json};
    use sqlx::MySqlPool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas")))]
    async fn test_listar_areas(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;
        let (name, value) = bearer(&token);

        let response = server.get("/api/areas").add_header(name, value).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["totalResultados"], 2);
        let areas = body["data"]["areas"].as_array().unwrap();
        assert_eq!(areas[0]["codigo"], 11);
        assert_eq!(areas[0]["regiao"], "SUDESTE");
        assert_eq!(areas[0]["cidades"], json!([]));
        assert_eq!(areas[1]["codigo"], 31);
        assert_eq!(areas[1]["cidades"].as_array().unwrap().len(), 4);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas")))]
    async fn test_cadastrar_area(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;

        let (name, value) = bearer(&token);
        let response = server
            .post("/api/areas")
            .add_header(name, value)
            .json(&json!({
                "codigo": 21,
                "regiao": "SUDESTE",
                "siglaEstado": "RJ",
                "cidades": ["Rio de Janeiro", "Niterói"],
                "descricao": "Capital e região metropolitana"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["id"], 3);
        assert_eq!(body["data"]["codigo"], 21);
        assert_eq!(body["data"]["cidades"], json!(["Rio de Janeiro", "Niterói"]));

        let (name, value) = bearer(&token);
        let body: Value = server.get("/api/areas/3").add_header(name, value).await.json();
        assert_eq!(body["data"]["siglaEstado"], "RJ");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas")))]
    async fn test_cadastrar_area_duplicada(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;
        let (name, value) = bearer(&token);

        let response = server
            .post("/api/areas")
            .add_header(name, value)
            .json(&json!({ "codigo": 11, "regiao": "SUDESTE", "siglaEstado": "SP" }))
            .await;

        response.assert_status_conflict();
        let body: Value = response.json();
        assert_eq!(body["message"], messages::CODIGO_AREA_DUPLICADO);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas")))]
    async fn test_cadastrar_area_invalida(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;

        let (name, value) = bearer(&token);
        let response = server
            .post("/api/areas")
            .add_header(name, value)
            .json(&json!({ "codigo": 100, "regiao": "SUL", "siglaEstado": "rs" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], messages::DADOS_INVALIDOS);

        let (name, value) = bearer(&token);
        server
            .post("/api/areas")
            .add_header(name, value)
            .json(&json!({ "codigo": 51, "regiao": "LESTE", "siglaEstado": "RS" }))
            .await
            .assert_status_unprocessable_entity();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas", "contatos")))]
    async fn test_atualizar_codigo_leva_contatos(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;

        let (name, value) = bearer(&token);
        let response = server
            .patch("/api/areas/2")
            .add_header(name, value)
            .json(&json!({ "codigo": 32 }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["codigo"], 32);
        assert_eq!(body["data"]["siglaEstado"], "MG");

        let (name, value) = bearer(&token);
        let body: Value = server.get("/api/contatos/1").add_header(name, value).await.json();
        assert_eq!(body["data"]["codigoArea"], 32);
        assert_eq!(body["data"]["area"]["codigo"], 32);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas")))]
    async fn test_atualizar_para_codigo_em_uso(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;

        let (name, value) = bearer(&token);
        let response = server
            .patch("/api/areas/2")
            .add_header(name, value)
            .json(&json!({ "codigo": 11 }))
            .await;
        response.assert_status_conflict();

        let (name, value) = bearer(&token);
        server
            .patch("/api/areas/99")
            .add_header(name, value)
            .json(&json!({ "descricao": "Nada" }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("areas", "contatos")))]
    async fn test_excluir_area_remove_contatos(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, token) = authenticated_server(pool).await;

        // warm the contact listing cache, the area deletion must drop it
        let (name, value) = bearer(&token);
        let body: Value = server.get("/api/contatos").add_header(name, value).await.json();
        assert_eq!(body["data"]["totalResultados"], 2);

        let (name, value) = bearer(&token);
        let response = server.delete("/api/areas/2").add_header(name, value).await;
        response.assert_status_ok();

        let (name, value) = bearer(&token);
        let body: Value = server.get("/api/contatos").add_header(name, value).await.json();
        assert_eq!(body["data"]["totalResultados"], 1);
        assert_eq!(body["data"]["contatos"][0]["codigoArea"], 11);

        let (name, value) = bearer(&token);
        let missing = server.get("/api/areas/2").add_header(name, value).await;
        missing.assert_status_not_found();
        let body: Value = missing.json();
        assert_eq!(body["message"], messages::AREA_NAO_ENCONTRADA);

        let (name, value) = bearer(&token);
        server
            .delete("/api/areas/2")
            .add_header(name, value)
            .await
            .assert_status_not_found();
        Ok(())
    }
}
