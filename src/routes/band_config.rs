//! Read-only view of the fixed band configuration.
//!
//! There is no reconfiguration endpoint; the dashboard reads the active
//! tables and legend from here to label its gauges.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::alerts::BAND_CONFIG;
use crate::brtime;

// ---

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/configuracoes", get(configuration))
        .route("/configuracoes/info", get(system_info))
}

/// Handle `GET /configuracoes`: the active band tables plus the
/// descriptive metadata the dashboard renders next to them.
async fn configuration() -> Json<Value> {
    // ---
    info!("GET /configuracoes");

    Json(json!({
        "status": "sucesso",
        "message": "Configuração obtida com sucesso",
        "configuracao": BAND_CONFIG,
        "descricao": "Compressores Médios (15-37 kW) - Faixa intermediária ideal",
        "categoria": "compressores_medios",
        "faixa_potencia": "15-37 kW",
        "versao": "1.1",
        "data_aplicacao": brtime::now_br(),
        "parametros_monitorados": [
            "pressao",
            "temperatura_equipamento",
            "temperatura_ambiente",
            "potencia",
            "umidade",
            "vibracao"
        ],
        "niveis_alerta": {
            "muito_baixo": { "cor": "azul", "descricao": "Valor muito baixo - verificar funcionamento" },
            "baixo": { "cor": "amarelo", "descricao": "Valor baixo - monitorar operação" },
            "normal": { "cor": "verde", "descricao": "Operação dentro dos parâmetros normais" },
            "alto": { "cor": "laranja", "descricao": "Valor alto - atenção necessária" },
            "critico": { "cor": "vermelho", "descricao": "Valor crítico - intervenção imediata" }
        }
    }))
}

/// Handle `GET /configuracoes/info`: static system information.
async fn system_info() -> Json<Value> {
    // ---
    Json(json!({
        "projeto": "Monitoramento de Compressores Industriais",
        "versao": "1.1",
        "tipo_configuracao": "Fixa - Compressores Médios",
        "funcionalidades": {
            "monitoramento_tempo_real": "Avaliação contínua de parâmetros",
            "alertas_integrados": "Alertas incluídos nos dados do compressor",
            "configuracao_fixa": "Limites pré-definidos por faixa de potência"
        },
        "parametros_monitorados": [
            "pressao",
            "temperatura_equipamento",
            "temperatura_ambiente",
            "potencia",
            "umidade",
            "vibracao"
        ],
        "niveis_alerta": [
            "muito_baixo",
            "baixo",
            "normal",
            "alto",
            "critico"
        ]
    }))
}
